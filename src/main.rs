//! docker-ucp - converge Docker UCP and DTR on this host
//!
//! This is the main CLI entry point for docker-ucp.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use docker_ucp::config::{DtrConfig, Manifest, Settings, UcpConfig};
use docker_ucp::exec::{
    Executor, RetryPolicy, ShellRunner, DEFAULT_SHELL, DEFAULT_TRIES, DEFAULT_TRY_SLEEP,
};
use docker_ucp::flags::{
    dtr_install_flags, install_flags, join_flags, swarm_join_flags, uninstall_flags,
};
use docker_ucp::plan::{plan_manifest, ExecSpec};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// docker-ucp - install, join and remove Docker UCP and DTR
#[derive(Parser)]
#[command(name = "docker-ucp")]
#[command(author = "Evoker Industries")]
#[command(version)]
#[command(about = "Converge Docker Universal Control Plane and Trusted Registry on this host", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Attempts per command before giving up
    #[arg(long, global = true, default_value_t = DEFAULT_TRIES)]
    tries: u32,

    /// Seconds to wait between attempts
    #[arg(long, global = true, default_value_t = DEFAULT_TRY_SLEEP.as_secs())]
    try_sleep: u64,

    /// Shell used to run commands
    #[arg(long, global = true, default_value = DEFAULT_SHELL)]
    shell: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ManifestArgs {
    /// Manifest file (defaults to ./docker-ucp.yaml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override a setting, e.g. `--set tracking=false` or `--set dtr.replica_id=abc`
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Converge every section of the manifest
    Apply {
        #[command(flatten)]
        manifest: ManifestArgs,
        /// Check guards but do not run anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the commands a manifest would run
    Plan {
        #[command(flatten)]
        manifest: ManifestArgs,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the flag string for one bootstrapper action
    Flags {
        kind: FlagKind,
        #[command(flatten)]
        manifest: ManifestArgs,
    },

    /// Manage the Trusted Registry only
    Dtr {
        #[command(subcommand)]
        command: DtrCommands,
    },
}

#[derive(Subcommand)]
enum DtrCommands {
    /// Converge the `dtr` section
    Apply {
        #[command(flatten)]
        manifest: ManifestArgs,
        /// Check guards but do not run anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the command the `dtr` section would run
    Plan {
        #[command(flatten)]
        manifest: ManifestArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FlagKind {
    Install,
    Join,
    SwarmJoin,
    Uninstall,
    Dtr,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let retry = RetryPolicy::new(cli.tries, Duration::from_secs(cli.try_sleep));
    let runner = ShellRunner::new(&cli.shell);

    match cli.command {
        Commands::Apply { manifest, dry_run } => {
            let manifest = load_manifest(&manifest)?;
            if manifest.is_empty() {
                tracing::warn!("Manifest has no ucp or dtr section, nothing to do");
                return Ok(());
            }

            let specs = plan_manifest(&manifest, retry)?;
            let executor = Executor::new(runner).dry_run(dry_run);
            for spec in &specs {
                let outcome = executor.apply(spec)?;
                println!("{}: {}", spec.title, outcome);
            }
        }

        Commands::Plan { manifest, json } => {
            let manifest = load_manifest(&manifest)?;
            let specs = plan_manifest(&manifest, retry)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&specs)?);
            } else {
                for spec in &specs {
                    println!("{}\n", spec);
                }
            }
        }

        Commands::Flags { kind, manifest } => {
            let manifest = load_manifest(&manifest)?;
            let ucp = || -> anyhow::Result<UcpConfig> {
                let settings = manifest.ucp.clone().unwrap_or_else(|| Settings::new("ucp"));
                Ok(UcpConfig::from_settings(&settings)?)
            };
            let flags = match kind {
                FlagKind::Install => install_flags(&ucp()?.install_options()),
                FlagKind::Join => join_flags(&ucp()?.join_options()),
                FlagKind::SwarmJoin => swarm_join_flags(&ucp()?.swarm_join_options()),
                FlagKind::Uninstall => uninstall_flags(&ucp()?.uninstall_options()),
                FlagKind::Dtr => {
                    let settings = manifest.dtr.clone().unwrap_or_else(|| Settings::new("dtr"));
                    dtr_install_flags(&DtrConfig::from_settings(&settings)?.dtr_options())
                }
            };
            println!("{}", flags.redacted());
        }

        Commands::Dtr { command } => match command {
            DtrCommands::Apply { manifest, dry_run } => {
                let spec = dtr_spec(&manifest, retry)?;
                let outcome = Executor::new(runner).dry_run(dry_run).apply(&spec)?;
                println!("{}: {}", spec.title, outcome);
            }
            DtrCommands::Plan { manifest } => {
                println!("{}", dtr_spec(&manifest, retry)?);
            }
        },
    }

    Ok(())
}

fn load_manifest(args: &ManifestArgs) -> anyhow::Result<Manifest> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => Manifest::find(&std::env::current_dir()?),
    };

    let mut manifest = match path {
        Some(path) => Manifest::load(&path)
            .with_context(|| format!("loading manifest {}", path.display()))?,
        None => {
            tracing::debug!("No manifest file found, using overrides only");
            Manifest::default()
        }
    };

    for spec in &args.overrides {
        manifest.apply_override(spec)?;
    }

    Ok(manifest)
}

fn dtr_spec(args: &ManifestArgs, retry: RetryPolicy) -> anyhow::Result<ExecSpec> {
    let manifest = load_manifest(args)?;
    let config = manifest
        .dtr_config()?
        .context("manifest has no dtr section")?;
    Ok(ExecSpec::dtr(&config)?.with_retry(retry))
}
