use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
use commands::{list::ListArgs, run::RunArgs, test::TestArgs};

#[derive(Parser)]
#[command(name = "odin")]
#[command(about = "Task-driven check engine for network vulnerability probes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks for a task file and write NDJSON findings.
    Run(RunArgs),

    /// List the registered checks.
    List(ListArgs),

    /// Run a single check against one target, for local debugging.
    Test(TestArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::List(args) => commands::list::execute(args),
        Commands::Test(args) => commands::test::execute(args),
    }
}
