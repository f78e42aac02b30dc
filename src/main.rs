#[tokio::main]
async fn main() -> anyhow::Result<()> {
    billbot::run().await
}
