#[tokio::main]
async fn main() -> std::io::Result<()> {
    shooter_sim::run_with_config().await
}
