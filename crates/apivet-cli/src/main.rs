//! apivet CLI
//!
//! Command-line interface for backward-compatibility checks of HTTP APIs.

use clap::{Parser, Subcommand};

mod commands;
mod conf;

#[derive(Debug, Parser)]
#[command(name = "apivet")]
#[command(about = "apivet - backward compatibility checks for HTTP APIs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay recorded requests and compare responses across versions
    Test(commands::test::TestArgs),
}

// Exit codes: 0 all fixtures passed, 1 a fixture failed or errored,
// 2 configuration problems (clap reports its own parse errors with 2).
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Test(args) => commands::test::execute(args).await,
    };
    std::process::exit(code);
}
