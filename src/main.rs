//! `view-router` binary: serve, check or resolve a route table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use view_router::config::{load_config, ConfigWatcher, RouterAppConfig};
use view_router::http::HttpServer;
use view_router::lifecycle::{self, Shutdown};
use view_router::navigation::Navigator;
use view_router::observability::{logging, metrics};
use view_router::routing::RouteTree;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "router.toml";

#[derive(Parser)]
#[command(name = "view-router")]
#[command(about = "Declarative hierarchical view router", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the history-mode development server (default)
    Serve,
    /// Compose the route table and print it
    Check,
    /// Resolve an app path (e.g. `/admin/users?page=2`) offline and print the match as JSON
    Resolve { location: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG)).filter(|p| p.exists()));
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => RouterAppConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, config_path).await,
        Command::Check => {
            let tree = lifecycle::build_tree(&config)?;
            print_table(&tree);
            Ok(())
        }
        Command::Resolve { location } => {
            let tree = lifecycle::build_tree(&config)?;
            let route = tree.resolve(&location)?;
            println!("{}", serde_json::to_string_pretty(&route)?);
            Ok(())
        }
    }
}

async fn serve(
    config: RouterAppConfig,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?config_path,
        "view-router starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let navigator = lifecycle::init_navigator(&config)?;
    let shell = lifecycle::load_shell(&config).await?;

    let shutdown = Shutdown::new();
    lifecycle::spawn_signal_handler(shutdown.clone());

    // The watcher handle must outlive the server.
    let _watcher = match config_path.as_deref() {
        Some(path) if config.server.watch_config => {
            Some(spawn_reload(path, navigator.clone(), &shutdown)?)
        }
        _ => None,
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        history = ?config.router.history,
        base = %config.router.base,
        "Listening for connections"
    );

    HttpServer::new(navigator, shell, &config.server)
        .run(listener, shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Watch the config file and recompose the tree on every valid change.
fn spawn_reload(
    path: &Path,
    navigator: Arc<Navigator>,
    shutdown: &Shutdown,
) -> Result<notify::RecommendedWatcher, notify::Error> {
    let (watcher, updates) = ConfigWatcher::new(path);
    let handle = watcher.run()?;
    lifecycle::spawn_reload_task(updates, navigator, shutdown);
    Ok(handle)
}

fn print_table(tree: &RouteTree) {
    for route in tree.routes() {
        let views: Vec<&str> = route.views.iter().map(|v| v.as_str()).collect();
        println!(
            "{indent}{path:<width$} {name:<16} [{section}] {views}",
            indent = "  ".repeat(route.depth),
            path = route.path,
            width = 32usize.saturating_sub(route.depth * 2),
            name = route.name.as_deref().unwrap_or("-"),
            section = route.section,
            views = views.join(" > "),
        );
    }
    println!("{} routes", tree.len());
}
