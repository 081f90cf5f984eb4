use clap::Parser;

use bim_dss::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    run(cli).await
}
