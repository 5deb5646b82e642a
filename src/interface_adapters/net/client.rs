// WebSocket sessions for renderer/input clients, plus the serializers that
// turn domain broadcasts into shared JSON frames.

use crate::domain::ActorInput;
use crate::interface_adapters::protocol::{
    ClientMessage, NoticeDto, ServerMessage, WorldUpdateDto,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::next_id;
use crate::use_cases::{GameEvent, ServerState, SimNotice, WorldUpdate};

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    WorldUpdatesClosed,
    NoticesClosed,
    ServerStateClosed,
}

#[derive(Debug, serde::Deserialize)]
pub struct ConnectQuery {
    // Optional actor id when the client has a preassigned identity.
    #[serde(default)]
    actor_id: Option<u64>,
    // Spectators receive updates but never spawn an actor.
    #[serde(default)]
    spectate: bool,
}

pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    world_latest_tx: watch::Sender<Utf8Bytes>,
) {
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::WorldUpdate(WorldUpdateDto::from(update));
                let Some(bytes) = encode(&msg) else {
                    continue;
                };
                // Latest frame doubles as the resync snapshot for lagging sessions.
                let _ = world_latest_tx.send(bytes.clone());
                let _ = world_bytes_tx.send(bytes);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "world serializer lagged; skipping ahead");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("world updates channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub async fn notice_serializer(
    mut notice_rx: broadcast::Receiver<SimNotice>,
    notice_bytes_tx: broadcast::Sender<Utf8Bytes>,
) {
    loop {
        match notice_rx.recv().await {
            Ok(notice) => {
                let msg = ServerMessage::Notice(NoticeDto::from(notice));
                if let Some(bytes) = encode(&msg) {
                    let _ = notice_bytes_tx.send(bytes);
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                // Notices are not replayable; dropped ones are only logged.
                warn!(missed = n, "notice serializer lagged; notices dropped");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("notice channel closed; serializer exiting");
                break;
            }
        }
    }
}

/// Spawns the tasks that turn domain broadcasts into shared JSON bytes.
pub fn spawn_serializers(
    world_tx: &broadcast::Sender<WorldUpdate>,
    notice_tx: &broadcast::Sender<SimNotice>,
    state: &AppState,
) {
    tokio::spawn(world_update_serializer(
        world_tx.subscribe(),
        state.world_bytes_tx.clone(),
        state.world_latest_tx.clone(),
    ));
    tokio::spawn(notice_serializer(
        notice_tx.subscribe(),
        state.notice_bytes_tx.clone(),
    ));
}

// Serialize once; every session forwards the same bytes.
fn encode(msg: &ServerMessage) -> Option<Utf8Bytes> {
    match serde_json::to_string(msg) {
        Ok(txt) => Some(Utf8Bytes::from(txt)),
        Err(e) => {
            error!(error = ?e, "failed to serialize server message");
            None
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, query: ConnectQuery) {
    // Connection id correlates logs before the actor id is known.
    let conn_id = next_id();
    let span = info_span!("conn", conn_id, actor_id = tracing::field::Empty);
    serve_connection(socket, state, query, span.clone())
        .instrument(span)
        .await;
}

async fn serve_connection(
    mut socket: WebSocket,
    state: Arc<AppState>,
    query: ConnectQuery,
    span: Span,
) {
    let mut session = match Session::open(&mut socket, &state, query).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: "bootstrap failed".into(),
                })))
                .await;
            let _ = socket.close().await;
            return;
        }
    };

    span.record("actor_id", session.actor_id);
    info!(controls = session.controls, "client connected");

    let outcome = session.run(&mut socket).await;
    if let Err(e) = session.close().await {
        warn!(error = ?e, "error during disconnect cleanup");
    }
    if let Err(e) = outcome {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

/// Rate limiter for noisy per-connection warnings.
struct Throttle(Option<Instant>);

impl Throttle {
    fn new() -> Self {
        Self(None)
    }

    fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.0 {
            Some(last) if now.duration_since(last) < LOG_THROTTLE => false,
            _ => {
                self.0 = Some(now);
                true
            }
        }
    }
}

// Receiving ends of the shared broadcasts, subscribed before the first await.
struct Feeds {
    world_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    world_latest_rx: watch::Receiver<Utf8Bytes>,
    notice_bytes_rx: broadcast::Receiver<Utf8Bytes>,
    server_state_rx: watch::Receiver<ServerState>,
}

#[derive(Default)]
struct SessionStats {
    msgs_in: u64,
    msgs_out: u64,
    invalid_json: u32,
}

enum Flow {
    Continue,
    Disconnect,
}

struct Session {
    actor_id: u64,
    // False for spectators: no actor spawned, inputs ignored.
    controls: bool,
    input_tx: mpsc::Sender<GameEvent>,
    feeds: Feeds,
    stats: SessionStats,
    input_full_log: Throttle,
    invalid_input_log: Throttle,
    world_lag_log: Throttle,
    close_frame: Option<CloseFrame>,
}

impl Session {
    /// Sends the identity, joins the world (unless spectating) and reports the loop state.
    async fn open(
        socket: &mut WebSocket,
        state: &AppState,
        query: ConnectQuery,
    ) -> Result<Self, NetError> {
        let feeds = Feeds {
            world_bytes_rx: state.world_bytes_tx.subscribe(),
            world_latest_rx: state.world_latest_tx.subscribe(),
            notice_bytes_rx: state.notice_bytes_tx.subscribe(),
            server_state_rx: state.server_state_tx.subscribe(),
        };

        let actor_id = query.actor_id.unwrap_or_else(next_id);
        let controls = !query.spectate;

        send_message(
            socket,
            &ServerMessage::Identity {
                actor_id: actor_id.to_string(),
            },
        )
        .await?;

        if controls {
            state
                .input_tx
                .send(GameEvent::Join { actor_id })
                .await
                .map_err(|_| NetError::InputClosed)?;
        }

        let session = Self {
            actor_id,
            controls,
            input_tx: state.input_tx.clone(),
            feeds,
            stats: SessionStats::default(),
            input_full_log: Throttle::new(),
            invalid_input_log: Throttle::new(),
            world_lag_log: Throttle::new(),
            close_frame: None,
        };

        let initial = session.feeds.server_state_rx.borrow().clone();
        if let Err(e) = send_message(socket, &ServerMessage::SimState(initial.into())).await {
            // Do not leave an actor behind for a socket that never came up.
            let _ = session.close().await;
            return Err(e);
        }

        Ok(session)
    }

    async fn run(&mut self, socket: &mut WebSocket) -> Result<(), NetError> {
        loop {
            let flow = tokio::select! {
                incoming = socket.recv() => self.on_incoming(incoming),
                world = self.feeds.world_bytes_rx.recv() => match world {
                    Ok(bytes) => Ok(self.forward(socket, bytes).await),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if self.world_lag_log.ready() {
                            warn!(missed = n, "world updates lagged; sending latest snapshot");
                        }
                        let latest = self.feeds.world_latest_rx.borrow().clone();
                        if latest.is_empty() {
                            Ok(Flow::Continue)
                        } else {
                            Ok(self.forward(socket, latest).await)
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => Err(NetError::WorldUpdatesClosed),
                },
                notice = self.feeds.notice_bytes_rx.recv() => match notice {
                    Ok(bytes) => Ok(self.forward(socket, bytes).await),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!(missed = n, "notices lagged; skipping");
                        Ok(Flow::Continue)
                    }
                    Err(broadcast::error::RecvError::Closed) => Err(NetError::NoticesClosed),
                },
                changed = self.feeds.server_state_rx.changed() => match changed {
                    Ok(()) => {
                        let st = self.feeds.server_state_rx.borrow_and_update().clone();
                        let msg = ServerMessage::SimState(st.into());
                        Ok(self.forward_message(socket, &msg).await)
                    }
                    Err(_) => Err(NetError::ServerStateClosed),
                },
            };

            match flow {
                Ok(Flow::Continue) => {}
                Ok(Flow::Disconnect) => {
                    self.shut_socket(socket).await;
                    return Ok(());
                }
                Err(e) => {
                    self.shut_socket(socket).await;
                    return Err(e);
                }
            }
        }
    }

    fn on_incoming(
        &mut self,
        incoming: Option<Result<Message, axum::Error>>,
    ) -> Result<Flow, NetError> {
        let actor_id = self.actor_id;
        let msg = match incoming {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                warn!(actor_id, error = %e, "websocket recv error");
                return Ok(Flow::Disconnect);
            }
            None => {
                info!(actor_id, "websocket closed");
                return Ok(Flow::Disconnect);
            }
        };

        match msg {
            Message::Text(text) => {
                self.stats.msgs_in += 1;
                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Input(dto)) => self.on_input(dto.into()),
                    Err(parse_err) => {
                        self.stats.invalid_json += 1;
                        if self.invalid_input_log.ready() {
                            warn!(
                                actor_id,
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }
                        if self.stats.invalid_json > MAX_INVALID_JSON {
                            self.close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(Flow::Disconnect);
                        }
                        Ok(Flow::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                self.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(Flow::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(Flow::Continue),
            Message::Close(_) => Ok(Flow::Disconnect),
        }
    }

    fn on_input(&mut self, input: ActorInput) -> Result<Flow, NetError> {
        let actor_id = self.actor_id;
        if !self.controls {
            if self.invalid_input_log.ready() {
                warn!(actor_id, "spectator input ignored");
            }
            return Ok(Flow::Continue);
        }

        let Some(input) = sanitize_input(input) else {
            if self.invalid_input_log.ready() {
                warn!(actor_id, "invalid input values (NaN/inf); dropping");
            }
            return Ok(Flow::Continue);
        };

        match self.input_tx.try_send(GameEvent::Input { actor_id, input }) {
            Ok(()) => Ok(Flow::Continue),
            Err(mpsc::error::TrySendError::Full(_)) => {
                // Inputs are level-triggered; the next one replaces this anyway.
                if self.input_full_log.ready() {
                    warn!(actor_id, "input channel full; dropping input");
                }
                Ok(Flow::Continue)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(NetError::InputClosed),
        }
    }

    async fn forward(&mut self, socket: &mut WebSocket, bytes: Utf8Bytes) -> Flow {
        match socket.send(Message::Text(bytes)).await {
            Ok(()) => {
                self.stats.msgs_out += 1;
                Flow::Continue
            }
            Err(e) => {
                warn!(error = %e, "failed to forward message");
                Flow::Disconnect
            }
        }
    }

    async fn forward_message(&mut self, socket: &mut WebSocket, msg: &ServerMessage) -> Flow {
        match send_message(socket, msg).await {
            Ok(()) => {
                self.stats.msgs_out += 1;
                Flow::Continue
            }
            Err(e) => {
                warn!(error = ?e, "failed to send simulation state");
                Flow::Disconnect
            }
        }
    }

    async fn shut_socket(&mut self, socket: &mut WebSocket) {
        if let Some(frame) = self.close_frame.take() {
            let _ = socket.send(Message::Close(Some(frame))).await;
        }
        if let Err(e) = socket.close().await {
            debug!(error = %e, "socket close error");
        }
    }

    /// Removes the actor this session spawned, if any.
    async fn close(&self) -> Result<(), NetError> {
        let actor_id = self.actor_id;
        let SessionStats {
            msgs_in,
            msgs_out,
            invalid_json,
        } = self.stats;
        debug!(actor_id, msgs_in, msgs_out, invalid_json, "connection stats");

        if self.controls {
            self.input_tx
                .send(GameEvent::Leave { actor_id })
                .await
                .map_err(|_| NetError::InputClosed)?;
        }
        info!(actor_id, "client disconnected");
        Ok(())
    }
}

fn sanitize_input(input: ActorInput) -> Option<ActorInput> {
    if !input.direction.is_finite() {
        return None;
    }
    match input.aim {
        Some(aim) if !aim.is_finite() => None,
        _ => Some(input),
    }
}
