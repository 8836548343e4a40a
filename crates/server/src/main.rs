#[tokio::main]
async fn main() -> anyhow::Result<()> {
    asksql_server::start().await
}
