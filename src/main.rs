use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use vpn_endpoint_inspector::config::CONFIG_FILE;
use vpn_endpoint_inspector::platform::get_host_platform;
use vpn_endpoint_inspector::{
    Config, InspectionRecord, ScanObserver, ScanOrchestrator, Scanner, StatusLog,
};

#[derive(Parser)]
#[command(name = "vpn-endpoint-inspector")]
#[command(about = "Inspect local VPN client entries and the RRAS server role")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./vpn-endpoint-inspector.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan phonebook entries and the RRAS role
    Scan {
        /// Print the results as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Export the results to CSV (uses the configured path when no value is given)
        #[arg(long)]
        export: Option<Option<PathBuf>>,
    },
    /// Generate default config file
    Init,
}

/// Prints records as the scan produces them
struct ProgressPrinter<W> {
    out: Mutex<W>,
}

impl<W: Write> ProgressPrinter<W> {
    fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> ScanObserver for ProgressPrinter<W> {
    fn on_record(&self, record: &InspectionRecord) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "  found {} ({})", record.name, record.vpn_type);
        let _ = out.flush();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init => {
            info!("Generating default config...");
            let path = PathBuf::from(CONFIG_FILE);
            Config::default().save(&path)?;
            println!("Created default config: {}", CONFIG_FILE);
        }
        Commands::Scan { json, export } => {
            let config = Config::discover(cli.config.as_deref())?;
            let log = match &config.log.path {
                Some(path) => StatusLog::with_path(path.clone()),
                None => StatusLog::new(),
            };
            log.record("=== VpnEndpointInspector started ===");

            let result = run_scan(&config, log.clone(), json, export).await;
            if let Err(ref e) = result {
                error!("{}", e);
            }
            log.record("=== VpnEndpointInspector stopped ===");
            result?;
        }
    }

    Ok(())
}

async fn run_scan(
    config: &Config,
    log: StatusLog,
    json: bool,
    export: Option<Option<PathBuf>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let platform = get_host_platform()?;
    let scanner = Scanner::new(ScanOrchestrator::new(platform, config.rras.clone(), log));

    let observer: Arc<dyn ScanObserver> = if json {
        Arc::new(vpn_endpoint_inspector::scan::NullObserver)
    } else {
        Arc::new(ProgressPrinter::new(std::io::stdout()))
    };
    let summary = scanner.start_scan(observer)?.wait().await?;

    let records = scanner.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&*records)?);
    } else {
        print_table(&records);
        println!("{}", summary);
    }

    if let Some(path) = export {
        let path = path.unwrap_or_else(|| config.export.default_path.clone());
        let written = scanner.export(&path)?;
        println!("Exported {} record(s) to {}", written, path.display());
    }

    Ok(())
}

fn print_table(records: &[InspectionRecord]) {
    const HEADERS: [&str; 6] = ["Connection", "Type", "Server", "Port", "Auth", "Notes"];

    let rows: Vec<[String; 6]> = records.iter().map(InspectionRecord::fields).collect();
    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()).take(5) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 6]| {
        let mut out = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i < 5 {
                out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
            } else {
                out.push_str(cell);
            }
        }
        out
    };

    println!("{}", line(HEADERS));
    for row in &rows {
        println!("{}", line(row.each_ref().map(String::as_str)));
    }
}
