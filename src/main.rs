#[tokio::main]
async fn main() -> anyhow::Result<()> {
    openverse_gateway_lib::run().await
}
