//! CLI entry point for hostdiff.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use hostdiff_core::DiffReport;
use hostdiff_server::config::load_server_config;

#[derive(Parser)]
#[command(name = "hostdiff")]
#[command(about = "Compare host scan snapshots and track how a host changes over time")]
struct Cli {
    /// Config file prefix (default: hostdiff).
    #[arg(short, long, default_value = "hostdiff", global = true)]
    config: String,

    /// Snapshot directory override (otherwise read from config).
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server.
    Serve {
        /// Listen address override, e.g. 127.0.0.1:8080.
        #[arg(short, long)]
        listen: Option<String>,
    },
    /// Compare two local snapshot files without storing them.
    Diff {
        a: PathBuf,
        b: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Store a snapshot file named host_<ip>_<YYYY-MM-DDTHH-MM-SSZ>.json.
    Upload {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List stored snapshots for a host, newest first.
    History {
        address: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compare two stored snapshots by ID.
    Compare {
        id_a: String,
        id_b: String,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match cli.command {
        Command::Serve { .. } => fmt().with_env_filter(filter).json().init(),
        _ => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    let mut config = load_server_config(&cli.config)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Command::Serve { listen } => {
            if let Some(addr) = listen {
                config.listen_addr = addr;
            }
            hostdiff_server::start_server(config).await?;
        }
        Command::Diff { a, b, output } => {
            let bytes_a = read_file(&a)?;
            let bytes_b = read_file(&b)?;
            let report = hostdiff_engine::diff_snapshots(&bytes_a, &bytes_b)?;
            print_report(&report, output.json)?;
        }
        Command::Upload { file, output } => {
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow::anyhow!("Not a file path: {}", file.display()))?;
            let content = read_file(&file)?;

            let service = hostdiff_server::open_service(&config.data_dir)?;
            let info = service.upload_snapshot(filename, &content)?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}  {}  {}", info.id, info.address, info.timestamp);
            }
        }
        Command::History { address, output } => {
            let service = hostdiff_server::open_service(&config.data_dir)?;
            let snapshots = service.get_host_history(&address)?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&snapshots)?);
            } else if snapshots.is_empty() {
                println!("No snapshots stored for {address}");
            } else {
                for info in snapshots {
                    println!("{}  {}", info.id, info.timestamp);
                }
            }
        }
        Command::Compare { id_a, id_b, output } => {
            let service = hostdiff_server::open_service(&config.data_dir)?;
            let report = service.compare_snapshots(&id_a, &id_b)?;
            print_report(&report, output.json)?;
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_report(report: &DiffReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.summary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_only_on_output_commands() {
        assert!(Cli::try_parse_from(["hostdiff", "serve", "--json"]).is_err());

        let cli = Cli::try_parse_from(["hostdiff", "compare", "a", "b", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Compare { output: OutputArgs { json: true }, .. }
        ));

        let cli = Cli::try_parse_from(["hostdiff", "history", "10.0.0.1"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::History { output: OutputArgs { json: false }, .. }
        ));
    }
}
