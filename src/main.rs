//! Meta Router CLI
//!
//! Inspect and exercise a route configuration outside the proxy.
//!
//! ```text
//! meta-router check  routes.toml
//! meta-router route  routes.toml --meta service=orders --meta env=prod [--random 42]
//! meta-router watch  routes.toml [--metrics-addr 0.0.0.0:9090]
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use meta_router::config::{load_config, watcher::ConfigWatcher, RouterConfig};
use meta_router::observability::{logging, metrics};
use meta_router::{MetadataMap, Mutation, ResolvedRoute, RouteMatcher, RouteTable};

#[derive(Parser)]
#[command(name = "meta-router")]
#[command(about = "Route decisions for protocol-agnostic RPC proxies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a route configuration
    Check {
        config: PathBuf,
    },
    /// Route one request described by its metadata
    Route {
        config: PathBuf,

        /// Request metadata as key=value (repeatable)
        #[arg(short, long = "meta", value_parser = parse_key_val)]
        meta: Vec<(String, String)>,

        /// Random draw for weighted clusters; drawn if omitted
        #[arg(short, long)]
        random: Option<u64>,
    },
    /// Keep the configuration loaded and hot-reload it on change
    Watch {
        config: PathBuf,

        /// Expose Prometheus metrics on this address
        #[arg(long)]
        metrics_addr: Option<SocketAddr>,
    },
}

/// JSON view of a routing decision.
#[derive(Serialize)]
struct Decision<'a> {
    route: &'a str,
    cluster: &'a str,
    weighted: bool,
    random_value: u64,
    hash_key: Option<u64>,
    request_mutation: BTreeMap<String, String>,
    response_mutation: BTreeMap<String, String>,
}

impl<'a> Decision<'a> {
    fn new(resolved: &ResolvedRoute<'a>, metadata: &MetadataMap, random_value: u64) -> Self {
        let mut request = Mutation::new();
        resolved.request_mutation(&mut request);
        let mut response = Mutation::new();
        resolved.response_mutation(&mut response);

        Self {
            route: resolved.route_name(),
            cluster: resolved.cluster_name(),
            weighted: resolved.is_weighted(),
            random_value,
            hash_key: resolved.hash_key(metadata),
            request_mutation: request.into_iter().collect(),
            response_mutation: response.into_iter().collect(),
        }
    }
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in `{}`", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load(path: &Path) -> Result<RouterConfig, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    // Only the first subscriber wins; later installs are ignored.
    let _ = logging::init_logging(&config.observability);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config: path } => {
            let config = load(&path)?;
            let matcher = RouteMatcher::from_config(&config.routes)?;

            println!("{}: {} route(s)", path.display(), matcher.len());
            for entry in matcher.entries() {
                match entry.cluster_name() {
                    Some(cluster) => println!("  {} -> {}", entry.name(), cluster),
                    None => {
                        let split: Vec<String> = entry
                            .weighted_clusters()
                            .iter()
                            .map(|c| format!("{}:{}", c.cluster_name(), c.cluster_weight()))
                            .collect();
                        println!("  {} -> [{}]", entry.name(), split.join(", "));
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Route {
            config: path,
            meta,
            random,
        } => {
            let config = load(&path)?;
            let matcher = RouteMatcher::from_config(&config.routes)?;
            let metadata: MetadataMap = meta.into_iter().collect();
            let random_value = random.unwrap_or_else(rand::random::<u64>);

            match matcher.route(&metadata, random_value) {
                Some(resolved) => {
                    let decision = Decision::new(&resolved, &metadata, random_value);
                    println!("{}", serde_json::to_string_pretty(&decision)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("no route matched");
                    Ok(ExitCode::from(2))
                }
            }
        }
        Commands::Watch {
            config: path,
            metrics_addr,
        } => {
            let config = load(&path)?;
            if let Some(addr) = metrics_addr {
                metrics::init_metrics(addr)?;
            }

            let table = RouteTable::from_config(&config)?;
            tracing::info!(path = %path.display(), routes = table.load().len(), "Route table active");

            let (watcher, mut updates) = ConfigWatcher::new(&path);
            let _watcher = watcher.run()?;

            let shutdown = tokio::signal::ctrl_c();
            tokio::pin!(shutdown);

            loop {
                tokio::select! {
                    Some(new_config) = updates.recv() => {
                        // Errors are logged by the table; the old routes stay active.
                        let _ = table.reload(&new_config);
                    }
                    _ = &mut shutdown => {
                        tracing::info!("Shutdown signal received");
                        break;
                    }
                }
            }

            tracing::info!("Shutdown complete");
            Ok(ExitCode::SUCCESS)
        }
    }
}
