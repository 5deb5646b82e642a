mod support;

#[tokio::test]
async fn when_spawn_request_is_valid_then_it_is_accepted() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();
    let payload = serde_json::json!({
        "x": 0.0,
        "y": 0.0,
        "orientation": 0.0,
        "speed": 400.0,
        "max_range": 400.0
    });

    let res = client
        .post(format!("{base_url}/projectiles"))
        .json(&payload)
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), reqwest::StatusCode::ACCEPTED);
}

#[tokio::test]
async fn when_speed_is_not_positive_then_request_is_rejected() {
    let base_url = support::ensure_server();
    let client = reqwest::Client::new();
    let payload = serde_json::json!({
        "x": 0.0,
        "y": 0.0,
        "speed": -5.0,
        "max_range": 400.0
    });

    let res = client
        .post(format!("{base_url}/projectiles"))
        .json(&payload)
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.expect("json error body");
    let error = body["error"].as_str().expect("error message");
    assert!(error.contains("projectile_speed"), "got {error}");
}

#[tokio::test]
async fn when_spawned_projectile_is_observed_then_it_moves_along_its_orientation() {
    let mut socket = support::connect("spectate=true").await;
    let base_url = support::ensure_server();
    let launcher_id = 9_000_001_u64;
    let payload = serde_json::json!({
        "launcher_id": launcher_id,
        "x": 10.0,
        "y": 20.0,
        "orientation": 0.0,
        "speed": 400.0,
        "max_range": 400.0
    });

    let res = reqwest::Client::new()
        .post(format!("{base_url}/projectiles"))
        .json(&payload)
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(res.status(), reqwest::StatusCode::ACCEPTED);

    let launcher = launcher_id.to_string();
    let update = support::next_message(&mut socket, "WorldUpdate", |data| {
        data["projectiles"]
            .as_array()
            .is_some_and(|ps| ps.iter().any(|p| p["launcher_id"] == launcher.as_str()))
    })
    .await;

    let projectile = update["projectiles"]
        .as_array()
        .and_then(|ps| ps.iter().find(|p| p["launcher_id"] == launcher.as_str()))
        .expect("projectile present");
    // Facing +X: x only grows, y stays on the spawn line.
    assert!(projectile["x"].as_f64().expect("x") >= 10.0);
    assert_eq!(projectile["y"].as_f64().expect("y"), 20.0);
}
