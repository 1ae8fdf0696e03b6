use clap::{Parser, ValueEnum};
use db_infra::{orchestrate_migration, DbKind};
use migration::MigrationCommand;

#[derive(Clone, Copy, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration")]
#[command(about = "Parley database migration tool")]
struct Args {
    /// Migration command: up | down | fresh | reset | refresh | status
    command: MigrationCommand,

    /// Database type (defaults to DB_KIND, then sqlite-file)
    #[arg(short, long, value_enum)]
    db: Option<Db>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,db_infra=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let db_kind = match args.db {
        Some(Db::Postgres) => DbKind::Postgres,
        Some(Db::SqliteFile) => DbKind::SqliteFile,
        None => match DbKind::from_env() {
            Ok(kind) => kind,
            Err(e) => {
                eprintln!("❌ {e}");
                std::process::exit(2);
            }
        },
    };

    if let Err(e) = orchestrate_migration(db_kind, args.command).await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }
}
