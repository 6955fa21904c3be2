use backend::config::db::{db_url, DbOwner, DbProfile};
use clap::{Parser, ValueEnum};
// Connect through the sea_orm that migration re-exports so the connection
// type matches the migrator's.
use migration::sea_orm::Database;
use migration::{migrate, MigrationCommand};

#[derive(Clone, ValueEnum)]
enum Env {
    Prod,
    Test,
}

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Excursion backend database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,

    /// Runtime environment
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let profile = match args.env {
        Env::Prod => DbProfile::Prod,
        Env::Test => DbProfile::Test,
    };

    // Migrations run with owner-level credentials.
    let url = match db_url(profile, DbOwner::Owner) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let db = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&db, args.command.into()).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
