#[tokio::main]
async fn main() -> anyhow::Result<()> {
    blog_api::app::run().await
}
