use anyhow::{bail, Context as _};
use integrity_dashboard::metrics::MetricsBuilder;
use integrity_dashboard::notify::Notification;
use integrity_dashboard::transport::HttpTransport;
use integrity_dashboard::view::{DashboardView, SearchView, UploadView, VerificationView};
use integrity_dashboard::{Action, ActionOutcome, Dashboard, DashboardConfig};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "\
Usage: integrity-dashboard [--json] <command>

Commands:
  stats                 Show storage counters
  files                 List the most recent files
  upload <path>         Upload a file
  verify <name>         Verify one file
  verify-all            Verify every stored file
  delete <name> --yes   Delete a file (cannot be undone)
  search <query>        Search by file name or hash

Environment:
  DASHBOARD_URL                   Service root (default http://localhost:8080/)
  DASHBOARD_REQUEST_TIMEOUT_SECS  Per-request timeout
  DASHBOARD_METRICS_ADDR          Expose Prometheus metrics on this address
  RUST_LOG                        Log filter (default info)";

#[derive(Debug)]
enum Command {
    Stats,
    Files,
    Upload(PathBuf),
    Verify(String),
    VerifyAll,
    Delete { name: String, confirmed: bool },
    Search(String),
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        let (command, rest) = args.split_first()?;
        let command = match (command.as_str(), rest) {
            ("stats", []) => Command::Stats,
            ("files", []) => Command::Files,
            ("upload", [path]) => Command::Upload(PathBuf::from(path)),
            ("verify", [name]) => Command::Verify(name.clone()),
            ("verify-all", []) => Command::VerifyAll,
            ("delete", [name]) => Command::Delete {
                name: name.clone(),
                confirmed: false,
            },
            ("delete", [name, flag]) if flag == "--yes" => Command::Delete {
                name: name.clone(),
                confirmed: true,
            },
            ("search", words) if !words.is_empty() => Command::Search(words.join(" ")),
            _ => return None,
        };
        Some(command)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = match args.iter().position(|a| a == "--json") {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    };
    let Some(command) = Command::parse(&args) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let config = DashboardConfig::from_env().context("invalid DASHBOARD_URL")?;

    if let Ok(addr) = std::env::var("DASHBOARD_METRICS_ADDR") {
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("invalid DASHBOARD_METRICS_ADDR: {addr}"))?;
        MetricsBuilder::new().listen_addr(addr).build()?;
    }

    if !json {
        println!("\n╔══════════════════════════════════════════════════════════════════╗");
        println!("║          Integrity Dashboard                                     ║");
        println!("╚══════════════════════════════════════════════════════════════════╝\n");
        println!("📍 Service: {}\n", config.base_url);
    }

    let dashboard = Arc::new(Dashboard::connect(config)?);
    let mut notifications = dashboard.notifications().subscribe();

    let result = run(&dashboard, command, json).await;
    print_notifications(&mut notifications, json);
    result
}

async fn run(
    dashboard: &Arc<Dashboard<HttpTransport>>,
    command: Command,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        Command::Stats => {
            dashboard.initialize().await;
            let view = dashboard.dashboard_view();
            if json {
                return print_json(&view.cards);
            }
            for card in &view.cards {
                println!("  {:<15} {}", card.label, card.value);
            }
        }
        Command::Files => {
            dashboard.initialize().await;
            let view = dashboard.dashboard_view();
            if json {
                return print_json(&view);
            }
            print_files(&view);
        }
        Command::Upload(path) => {
            let mut state = dashboard.upload().subscribe();
            let progress = tokio::spawn(async move {
                while state.changed().await.is_ok() {
                    let percent = state.borrow_and_update().progress();
                    if let Some(percent) = percent {
                        if !json {
                            println!("  ⏫ {percent:>3}%");
                        }
                    }
                }
            });

            let outcome = dashboard.dispatch(Action::UploadPath(path)).await;
            progress.abort();
            outcome?;

            let view = dashboard.upload_view();
            if json {
                return print_json(&view);
            }
            if let UploadView::Success {
                filename,
                size,
                hash,
            } = view
            {
                println!("\n✅ Uploaded {filename}");
                println!("   Size: {size}");
                println!("   Hash: {hash}");
            }
        }
        Command::Verify(name) => {
            let outcome = dashboard.dispatch(Action::VerifyFile(name)).await?;
            if let ActionOutcome::Verified(result) = outcome {
                if json {
                    return print_json(&result);
                }
                println!(
                    "  {} {:<30} {}%",
                    result.status().icon(),
                    result.filename,
                    result.trust_score
                );
            }
        }
        Command::VerifyAll => {
            dashboard.dispatch(Action::VerifyAll).await?;
            if let Some(view) = dashboard.verification_view() {
                if json {
                    return print_json(&view);
                }
                print_verification(&view);
            }
        }
        Command::Delete { name, confirmed } => {
            if !confirmed {
                bail!("refusing to delete \"{name}\" without --yes; this action cannot be undone");
            }
            dashboard.dispatch(Action::Delete(name)).await?;
        }
        Command::Search(query) => {
            dashboard.dispatch(Action::Search(query)).await?;
            if let Some(view) = dashboard.search_view() {
                if json {
                    return print_json(&view);
                }
                print_search(&view);
            }
        }
    }
    Ok(())
}

fn print_json<V: Serialize>(value: &V) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_files(view: &DashboardView) {
    if let Some(message) = view.empty_message {
        println!("  📂 {message}");
        return;
    }

    println!(
        "  {:<30} {:>10}  {:<20} {}",
        "Name", "Size", "Hash", "Uploaded"
    );
    for row in &view.rows {
        println!(
            "  {:<30} {:>10}  {:<20} {}",
            row.file_name, row.size, row.hash, row.uploaded
        );
    }
    if view.total_files > view.rows.len() {
        println!("  … {} more", view.total_files - view.rows.len());
    }
}

fn print_verification(view: &VerificationView) {
    println!("  Verified:  {}", view.verified_count);
    println!("  Tampered:  {}", view.tampered_count);
    println!("  Security:  {}\n", view.security_percentage);
    println!("  Detailed Results:");
    for row in &view.rows {
        match &row.error {
            Some(error) => println!("  {} {:<30} {} ({error})", row.icon, row.filename, row.score),
            None => println!("  {} {:<30} {}", row.icon, row.filename, row.score),
        }
    }
}

fn print_search(view: &SearchView) {
    match view {
        SearchView::Empty { message } => println!("  🔍 {message}"),
        SearchView::Results { heading, rows } => {
            println!("  {heading}");
            for row in rows {
                println!(
                    "  {:<30} {:>10}  {:<20} {}",
                    row.file_name, row.size, row.hash, row.uploaded
                );
            }
        }
    }
}

fn print_notifications(rx: &mut broadcast::Receiver<Notification>, json: bool) {
    loop {
        match rx.try_recv() {
            Ok(note) if json => eprintln!("[{}] {}", note.severity, note.message),
            Ok(note) => println!("\n[{}] {}", note.severity, note.message),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}
