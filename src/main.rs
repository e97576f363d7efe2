use std::env;

use anyhow::{Context, Result};
use hub_calendar::{storage::FileStorage, EventStore};
use tokio::{net::TcpListener, signal};

mod cache;
mod cli;
mod server;

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "hub_calendar_server=info,hub_calendar=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

fn load_store(args: &cli::Args) -> Result<EventStore> {
    let mut store = match &args.events {
        Some(path) => EventStore::from_path(path)
            .with_context(|| format!("Failed to load events from {}", path.display()))?,
        None => EventStore::seed().context("Failed to load built-in events")?,
    };

    if let Some(dir) = &args.data_dir {
        let added = store
            .load_personal(&FileStorage::new(dir))
            .with_context(|| format!("Failed to load personal events from {}", dir.display()))?;
        log::info!("Loaded {added} personal events");
    }

    if !store.skipped().is_empty() {
        log::warn!(
            "{} events were skipped because of malformed dates",
            store.skipped().len()
        );
    }

    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let args = cli::parse(env::args().skip(1).collect());
    let store = load_store(&args)?;

    log::info!(
        "Serving {} events across {} semesters",
        store.len(),
        store.semesters().len()
    );

    let router = server::router(server::AppState {
        store,
        week_start: args.week_start,
        today: args.today,
        grids: cache::GridCache::new(cache::Config {
            enabled: args.enable_cache,
            capacity: args.cache_size,
        }),
    });

    let listener = TcpListener::bind(args.address).await?;
    log::info!("Listening at http://{}", args.address);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(err) = signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {err}");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
