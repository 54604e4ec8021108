use anyhow::Result;
use cotacao::{client, config::ClientConfig};
use env_logger::Env;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    client::run(&ClientConfig::default()).await
}
