//! BSA CLI - admin tool for the Portal BSA waste bank store.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bsa-cli",
    version,
    about = "Portal BSA (Bank Sampah Adiwiyata) waste records toolkit"
)]
struct Cli {
    /// SQLite database file (":memory:" for a throwaway store)
    #[arg(long, global = true, env = "BSA_DB", default_value = "portal-bsa.db")]
    db: String,

    #[command(subcommand)]
    command: bsa_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("using database {}", cli.db);
    bsa_cmd::run(cli.db, cli.command).await
}
