//! `rauta` command line.
//!
//! Runs the portal route table outside a browser: list routes, match a URL
//! speculatively, or replay a sequence of navigations against an in-memory
//! history and print what gets rendered.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use url::Url;

use rauta::config::{self, RautaConfig};
use rauta::indicator::IndicatorDriver;
use rauta::navigation::{MemoryHistory, Router, RouterStats};
use rauta::observability::logging;
use rauta::portal::{self, Page};
use rauta::preload::{EchoClient, Preloader};
use rauta::routing::RouteTable;

#[derive(Parser)]
#[command(name = "rauta", version)]
#[command(about = "Inspect and exercise the portal router", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route table in match order
    Routes,
    /// Match a URL without navigating and print the winning route
    Match { url: String },
    /// Start on a URL and apply each step: another URL, `back` or `forward`
    Navigate { start: String, steps: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => RautaConfig::default(),
    };
    logging::init(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        origin = %config.router.origin,
        release = ?config.router.release,
        "rauta starting"
    );

    let table = portal::route_table(&config.portal)?;
    let origin = Url::parse(&config.router.origin)?;

    match cli.command {
        Commands::Routes => {
            for name in table.names() {
                println!("{name}");
            }
        }
        Commands::Match { url } => {
            let url = origin.join(&url)?;
            let preloader = Preloader::new(Arc::new(EchoClient));
            println!("{}", table.probe(&url, &preloader));
        }
        Commands::Navigate { start, steps } => {
            let stats = navigate(table, &config, origin.join(&start)?, &steps).await?;
            println!(
                "navigations: {} started, {} committed, {} superseded; \
                 queries: {} preloaded, {} routes released, {} release failures",
                stats.started,
                stats.committed,
                stats.superseded,
                stats.preloads,
                stats.released,
                stats.dispose_failures
            );
        }
    }

    Ok(())
}

async fn navigate(
    table: RouteTable<Page>,
    config: &RautaConfig,
    start: Url,
    steps: &[String],
) -> Result<RouterStats, Box<dyn std::error::Error>> {
    let history = MemoryHistory::new(start);
    let router = Router::start(table, Arc::new(EchoClient), history.clone(), config)?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let driver = tokio::spawn(IndicatorDriver::new(router.indicator()).run(shutdown_rx));

    print_current(&router);
    for step in steps {
        let outcome = match step.as_str() {
            "back" | "forward" => {
                let moved = if step == "back" {
                    history.back()
                } else {
                    history.forward()
                };
                if moved.is_none() {
                    println!("{step}: no history entry");
                    continue;
                }
                router.handle_popstate()
            }
            target => router.goto(target),
        };
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("{step}: {e}");
                continue;
            }
        };
        println!("{step}: {outcome:?}");
        print_current(&router);
    }

    // Let the loading bar finish its fade.
    if let Some(deadline) = router.indicator().deadline() {
        tokio::time::sleep_until(deadline).await;
        router.indicator().tick();
    }
    println!("indicator: {:?}", router.indicator().state());

    router.shutdown();
    let _ = shutdown_tx.send(());
    driver.await?;

    Ok(router.stats())
}

fn print_current(router: &Router<Page>) {
    if let Some((page, token)) = router.active().render_with_token() {
        println!(
            "  {} → {page} (indicator: {:?})",
            router.location().url,
            router.indicator().state()
        );
        router.notify_mounted(token);
    }
}
