use datascienceproject::{Config, DataError, PackageMetadata, get_requirements, read_sql_data};
use mimalloc::MiMalloc;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const PREVIEW_ROWS: usize = 5;
const USAGE: &str = "usage: datascienceproject [load | requirements [PATH] | metadata]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        // Logging is not set up yet.
        if !e.not_found() {
            eprintln!("failed to read .env: {e}");
        }
    }

    let cfg = Config::load().map_err(DataError::from)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        host = %cfg.credentials.host,
        db = %cfg.credentials.db,
        database_url = %cfg.database_url.as_deref().unwrap_or("<none>"),
        loglevel = %cfg.loglevel
    );

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None | Some("load") => {
            let table = read_sql_data(&cfg).await?;
            println!("{}", table.head(PREVIEW_ROWS));
        }
        Some("requirements") => {
            let path = args.next().unwrap_or_else(|| "requirements.txt".to_string());
            for req in get_requirements(&path).map_err(DataError::from)? {
                println!("{req}");
            }
        }
        Some("metadata") => {
            let meta = PackageMetadata::from_manifest(Path::new(".")).map_err(DataError::from)?;
            println!("{}", serde_json::to_string_pretty(&meta).map_err(DataError::from)?);
        }
        Some(other) => {
            warn!(command = other, "unknown command");
            eprintln!("{USAGE}");
            return Err(format!("unknown command: {other}").into());
        }
    }
    Ok(())
}
