mod support;

use futures::SinkExt;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn when_client_connects_then_identity_and_running_state_are_sent() {
    let mut socket = support::connect("actor_id=7001").await;

    let identity = support::next_message(&mut socket, "Identity", |_| true).await;
    assert_eq!(identity["actor_id"], "7001");

    let state = support::next_message(&mut socket, "SimState", |_| true).await;
    assert_eq!(state, "Running");
}

#[tokio::test]
async fn when_client_joins_then_world_updates_include_its_actor() {
    let mut socket = support::connect("actor_id=7002").await;

    let update = support::next_message(&mut socket, "WorldUpdate", |data| {
        data["actors"]
            .as_array()
            .is_some_and(|actors| actors.iter().any(|a| a["id"] == "7002"))
    })
    .await;

    assert!(update["tick"].as_u64().expect("tick") > 0);
}

#[tokio::test]
async fn when_client_fires_then_a_projectile_from_its_actor_appears() {
    let mut socket = support::connect("actor_id=7003").await;
    support::next_message(&mut socket, "Identity", |_| true).await;

    let input = serde_json::json!({
        "type": "Input",
        "data": { "aim_x": 10000.0, "aim_y": 0.0, "fire": true }
    });
    socket
        .send(Message::Text(input.to_string().into()))
        .await
        .expect("send input");

    support::next_message(&mut socket, "WorldUpdate", |data| {
        data["projectiles"]
            .as_array()
            .is_some_and(|ps| ps.iter().any(|p| p["launcher_id"] == "7003"))
    })
    .await;
}

#[tokio::test]
async fn when_spectator_connects_then_no_actor_is_spawned() {
    let mut socket = support::connect("actor_id=7004&spectate=true").await;

    // A few ticks are enough for a join to have been applied.
    for _ in 0..5 {
        let update = support::next_message(&mut socket, "WorldUpdate", |_| true).await;
        let actors = update["actors"].as_array().expect("actors array");
        assert!(actors.iter().all(|a| a["id"] != "7004"));
    }
}
