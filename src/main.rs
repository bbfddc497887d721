use clap::Parser;
use memorag::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap(&cli.global)?;

    match cli.command {
        Command::Index(args) => cli::index::run(args, &config).await,
        Command::Search(args) => cli::search::run(args, &config).await,
    }
}
