use clap::Parser;
use morrowland_lib::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  morrowland_lib::run(Cli::parse()).await
}
