use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    specforge_cli::main_entry().await
}
