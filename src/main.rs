use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ddev_sweep::app::PlatformTable;
use ddev_sweep::config::{self, Settings};
use ddev_sweep::docker::DockerRuntime;
use ddev_sweep::router::{self, RuntimeRouter};
use ddev_sweep::{env, registry, status, teardown, ui};

#[derive(Parser)]
#[command(name = "ddev-sweep")]
#[command(about = "List and tear down local ddev environments")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every app with containers on this machine
    List {
        #[arg(long)]
        json: bool,
    },
    /// Stop and remove an app's containers and volumes
    #[command(alias = "rm")]
    Remove {
        /// App name; defaults to the app containing the working directory
        name: Option<String>,
    },
    /// Print the app root for a directory
    Root { path: Option<PathBuf> },
}

/// Call after `.env` is loaded so a `RUST_LOG` set there applies.
fn init_tracing(verbose: bool) {
    let mut filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "ddev_sweep=info".into()),
    );
    if verbose {
        if let Ok(directive) = "ddev_sweep=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    // stdout carries command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn stamp(line: &str) -> String {
    format!("[{}] {line}", Local::now().format("%H:%M:%S"))
}

async fn connect() -> Result<DockerRuntime> {
    let runtime = DockerRuntime::connect().context("could not connect to docker")?;
    if !runtime.available().await {
        bail!("Docker unavailable. Colima: colima start ; docker context use colima ; docker ps");
    }
    Ok(runtime)
}

async fn list(table: &PlatformTable, settings: &Settings, json: bool) -> Result<()> {
    let runtime = connect().await?;
    let found = registry::discover(&runtime, table).await;

    let color = ui::use_color();
    let mut all_rows = Vec::new();
    let mut total = 0;
    for (platform, apps) in &found.apps {
        let mut rows = Vec::with_capacity(apps.len());
        for app in apps {
            let st = status::status_label(&runtime, app).await;
            rows.push(ui::render_app_row(app, &st));
        }
        total += rows.len();
        if json {
            all_rows.extend(rows);
        } else {
            print!("{}", ui::render_app_table(*platform, &rows, color));
        }
    }

    if json {
        println!("{}", ui::render_json(&all_rows)?);
        return Ok(());
    }
    if total == 0 {
        println!("There are no running ddev applications.");
        return Ok(());
    }
    let router_state = router::router_status(&runtime, &settings.router_name).await?;
    println!("\nDDEV ROUTER STATUS: {}", ui::render_status(&router_state, color));
    Ok(())
}

async fn remove(table: &PlatformTable, settings: &Settings, name: Option<String>) -> Result<()> {
    let runtime = connect().await?;
    let app = match name {
        Some(name) => {
            let found = registry::discover(&runtime, table).await;
            found
                .find(&name)
                .cloned()
                .ok_or_else(|| anyhow!("no app named {name} has containers on this machine"))?
        }
        None => registry::active_app(table, &std::env::current_dir()?)?,
    };

    let router = RuntimeRouter::new(&runtime, &settings.router_name, settings.stop_timeout_secs);
    let report = teardown::cleanup(&runtime, &router, &app, settings.stop_timeout_secs)
        .await
        .with_context(|| format!("failed to remove {}", app.name()))?;

    for c in &report.stopped {
        println!("{}", stamp(&format!("Stopped container: {c}")));
    }
    for c in &report.removed_containers {
        println!("{}", stamp(&format!("Removed container: {c}")));
    }
    for v in &report.removed_volumes {
        println!("{}", stamp(&format!("Removed volume: {v}")));
    }
    println!("{} has been removed.", app.name());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let loaded_env = env::load_env(&cwd);
    init_tracing(cli.verbose);
    match loaded_env {
        Ok(true) => tracing::debug!(dir = %cwd.display(), "loaded .env"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
    }
    let settings = Settings::from_env();
    let table = PlatformTable::builtin();

    match cli.command {
        Command::List { json } => list(&table, &settings, json).await,
        Command::Remove { name } => remove(&table, &settings, name).await,
        Command::Root { path } => {
            let start = path.unwrap_or(cwd);
            println!("{}", config::locate(&start)?.display());
            Ok(())
        }
    }
}
