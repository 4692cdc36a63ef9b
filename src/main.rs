use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use ospf_audit::config::{apply_overrides, load_config, AuditConfig, CliOverrides};
use ospf_audit::evaluation;
use ospf_audit::orchestrator::{self, PredictionSource};

/// Rule-based OSPF misconfiguration detector and evaluator
#[derive(Parser, Debug)]
#[command(name = "ospf-audit", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an optional YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,

    /// Directory holding topology snapshots
    #[arg(long, global = true)]
    snapshots_dir: Option<PathBuf>,

    /// Directory for detector text reports
    #[arg(long, global = true)]
    reports_dir: Option<PathBuf>,

    /// Ground-truth annotation file
    #[arg(long, global = true)]
    ground_truth: Option<PathBuf>,

    /// Output directory for JSON and evaluation reports
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Management interface excluded from checks and advertisements
    #[arg(long, global = true)]
    management_interface: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Run the detector on every snapshot and write reports
    Detect,
    /// Parse the ground-truth file and export it as JSON
    Truth,
    /// Score detector output against the ground truth
    Evaluate {
        /// Run the detector on the snapshots instead of reading text reports
        #[arg(long)]
        from_snapshots: bool,
    },
    /// Render IOS configuration for the routers of one snapshot
    RenderConfig {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// Role book JSON; network statements follow it when given
        #[arg(long)]
        roles: Option<PathBuf>,
    },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            log_level: self.log_level.clone(),
            threads: self.threads,
            snapshots_dir: self.snapshots_dir.clone(),
            reports_dir: self.reports_dir.clone(),
            ground_truth: self.ground_truth.clone(),
            output_dir: self.output.clone(),
            management_interface: self.management_interface.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AuditConfig::default(),
    };
    apply_overrides(&mut config, &cli.overrides())?;

    let level = config.general.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Some(path) = &cli.config {
        info!("Configuration file: {}", path.display());
    }

    if config.general.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.general.threads)
            .build_global()
            .wrap_err("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Detect => {
            let results = orchestrator::run_detect(&config)?;
            for (id, detections) in &results {
                if !detections.is_empty() {
                    println!("Topology {}: {} findings", id, detections.len());
                }
            }
        }
        Commands::Truth => {
            let export = orchestrator::run_truth(&config)?;
            let annotated = export.findings.values().filter(|f| !f.is_empty()).count();
            println!(
                "Ground truth: {} topologies, {} with mismatches",
                export.findings.len(),
                annotated
            );
        }
        Commands::Evaluate { from_snapshots } => {
            let source = if from_snapshots {
                PredictionSource::Snapshots
            } else {
                PredictionSource::Reports
            };
            let report = orchestrator::run_evaluate(&config, source)?;
            evaluation::print_summary(&report);
        }
        Commands::RenderConfig { snapshot, roles } => {
            let configs = orchestrator::run_render(&config, &snapshot, roles.as_deref())?;
            info!("Rendered configuration for {} routers", configs.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["ospf-audit", "detect"]);

        assert_eq!(cli.command, Commands::Detect);
        assert!(cli.config.is_none());
        assert!(cli.threads.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "ospf-audit",
            "evaluate",
            "--from-snapshots",
            "-j",
            "4",
            "--ground-truth",
            "gt.txt",
        ]);

        assert_eq!(cli.command, Commands::Evaluate { from_snapshots: true });
        let overrides = cli.overrides();
        assert_eq!(overrides.threads, Some(4));
        assert_eq!(overrides.ground_truth, Some(PathBuf::from("gt.txt")));
        assert!(overrides.output_dir.is_none());
    }

    #[test]
    fn test_render_config_args() {
        let cli = Cli::parse_from([
            "ospf-audit",
            "--config",
            "audit.yaml",
            "render-config",
            "topologi_3.json",
            "--roles",
            "roles.json",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("audit.yaml")));
        assert_eq!(
            cli.command,
            Commands::RenderConfig {
                snapshot: PathBuf::from("topologi_3.json"),
                roles: Some(PathBuf::from("roles.json")),
            }
        );
    }
}
