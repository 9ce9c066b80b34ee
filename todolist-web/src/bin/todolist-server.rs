use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;

use todolist::store::SqliteStore;
use todolist_web::api::{self, SharedStore};

#[derive(Parser)]
#[command(name = "todolist-server", about = "JSON HTTP interface for the to-do list manager")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "TODOLIST_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Database file. Defaults to ~/.todolist/todolist.db.
    #[arg(long, env = "TODOLIST_DB")]
    db: Option<String>,

    /// Origin allowed to call the API from a browser.
    #[arg(long, env = "TODOLIST_CORS_ORIGIN", default_value = "http://localhost:3000")]
    cors_origin: String,
}

fn default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".todolist").join("todolist.db"))
}

fn resolve_db_path(cli_db: Option<String>) -> Result<String> {
    match cli_db {
        Some(p) => Ok(p),
        None => {
            let path = default_db_path()?;
            Ok(path
                .to_str()
                .context("default DB path is not valid UTF-8")?
                .to_string())
        }
    }
}

fn ensure_db_dir(db_path: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let db_path = resolve_db_path(args.db)?;
    ensure_db_dir(&db_path)?;
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open database {db_path}"))?;
    let store: SharedStore = Arc::new(Mutex::new(store));

    let router = api::build_router(store, api::cors_layer(&args.cors_origin)?);

    log::info!("using database {db_path}");
    log::info!("listening on http://{}", args.addr);
    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
