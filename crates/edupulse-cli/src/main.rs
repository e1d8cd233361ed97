use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod backup;
mod report;
mod run;

#[derive(Debug, Parser)]
#[command(name = "edupulse")]
#[command(about = "Reddit education-discourse sentiment warehouse")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Collect, analyze, and load posts for the configured topic matrix
    Run {
        /// Preview the query matrix without collecting or writing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip writing the raw-batch snapshot artifact
        #[arg(long)]
        skip_backup: bool,
    },
    /// Print a markdown aggregate report from the warehouse
    Report,
    /// Show recent pipeline runs
    Status {
        /// Number of runs to show
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = edupulse_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();

    let pool_config = edupulse_db::PoolConfig::from_app_config(&config);
    let pool = edupulse_db::connect_pool(&config.database_url(), pool_config).await?;
    edupulse_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Run {
            dry_run,
            skip_backup,
        } => run::run_pipeline(&pool, &config, dry_run, skip_backup).await,
        Commands::Report => report::run_report(&pool).await,
        Commands::Status { limit } => report::run_status(&pool, limit).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands};

    #[test]
    fn parses_run_defaults() {
        let cli = Cli::try_parse_from(["edupulse", "run"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run {
                dry_run: false,
                skip_backup: false,
            }
        ));
    }

    #[test]
    fn parses_run_dry_run() {
        let cli = Cli::try_parse_from(["edupulse", "run", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { dry_run: true, .. }));
    }

    #[test]
    fn parses_run_skip_backup() {
        let cli = Cli::try_parse_from(["edupulse", "run", "--skip-backup"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run {
                skip_backup: true,
                ..
            }
        ));
    }

    #[test]
    fn parses_report() {
        let cli = Cli::try_parse_from(["edupulse", "report"]).unwrap();
        assert!(matches!(cli.command, Commands::Report));
    }

    #[test]
    fn parses_status_with_limit() {
        let cli = Cli::try_parse_from(["edupulse", "status", "--limit", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { limit: 3 }));
    }

    #[test]
    fn status_limit_defaults_to_ten() {
        let cli = Cli::try_parse_from(["edupulse", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { limit: 10 }));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["edupulse", "ingest"]).is_err());
    }
}
