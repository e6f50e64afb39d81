//! devtrust - device registry trust and identity CLI

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    devtrust_cli::run().await
}
