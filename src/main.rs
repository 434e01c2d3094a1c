//! gwprofile CLI
//!
//! Entry point for the `gwprofile` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use gateway_profiles::status::render_profiles;
use gateway_profiles::{
    initialize, list_profiles, status, switch_profile, sync, ConfigStore, ProfileError,
    ProfileResult, Settings, SyncOutcome, TcpGatewayProbe,
};

#[derive(Parser)]
#[command(name = "gwprofile")]
#[command(about = "Switch the agent gateway between model profiles", version)]
#[command(
    after_help = "With no arguments, applies $GWPROFILE_PROFILE if set, otherwise prints status and profiles."
)]
#[command(group(ArgGroup::new("action").args(["profile", "list", "status", "sync", "init"])))]
struct Cli {
    /// Profile to apply (a file name under config/models/ without .json)
    profile: Option<String>,

    /// List available profiles
    #[arg(long, short = 'l')]
    list: bool,

    /// Show current profile, active model and profiles
    #[arg(long, short = 's')]
    status: bool,

    /// Fold manual edits of the active config back into the base config
    #[arg(long)]
    sync: bool,

    /// Create the base config and install example profiles
    #[arg(long)]
    init: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Store root (default: $GWPROFILE_ROOT or ~/.openclaw)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
}

enum Action {
    Status,
    List,
    Sync,
    Init,
    Switch(String),
}

impl Cli {
    fn action(&self, settings: &Settings) -> Action {
        if let Some(ref profile) = self.profile {
            Action::Switch(profile.clone())
        } else if self.list {
            Action::List
        } else if self.status {
            Action::Status
        } else if self.sync {
            Action::Sync
        } else if self.init {
            Action::Init
        } else if let Some(ref profile) = settings.default_profile {
            Action::Switch(profile.clone())
        } else {
            Action::Status
        }
    }
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version exit 0, usage errors exit 1
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let settings = match Settings::from_env(cli.root.clone()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &settings) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli, settings: &Settings) -> ProfileResult<()> {
    let store = ConfigStore::open(&settings.root);

    match cli.action(settings) {
        Action::Status => run_status(&store, cli.json),
        Action::List => run_list(&store, cli.json),
        Action::Sync => run_sync(&store, cli.json),
        Action::Init => run_init(&store, cli.json),
        Action::Switch(profile) => run_switch(&store, settings, &profile, cli.json),
    }
}

fn print_json<T: Serialize>(value: &T) -> ProfileResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ProfileError::GenerationFailed(format!("serializing output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

fn run_status(store: &ConfigStore, json: bool) -> ProfileResult<()> {
    let report = status(store)?;
    if json {
        return print_json(&report);
    }
    print!("{}", report.to_human());
    Ok(())
}

fn run_list(store: &ConfigStore, json: bool) -> ProfileResult<()> {
    let profiles = list_profiles(store)?;
    if json {
        return print_json(&profiles);
    }
    print!("{}", render_profiles(&profiles));
    Ok(())
}

fn run_sync(store: &ConfigStore, json: bool) -> ProfileResult<()> {
    let outcome = sync(store)?;
    if json {
        return print_json(&outcome);
    }
    print_sync_outcome(&outcome, store);
    Ok(())
}

fn print_sync_outcome(outcome: &SyncOutcome, store: &ConfigStore) {
    match outcome {
        SyncOutcome::NoActiveConfig => {
            println!(
                "No active config at {}, nothing to sync.",
                store.layout().active_config().display()
            );
        }
        SyncOutcome::Bootstrapped => {
            println!(
                "Created base config: {}",
                store.layout().base_config().display()
            );
        }
        SyncOutcome::Unchanged => println!("Base config is up to date."),
        SyncOutcome::Absorbed { backup } => {
            println!("Manual edits in the active config were saved to the base config.");
            if let Some(backup) = backup {
                println!("  Backup: {}", backup.display());
            }
        }
    }
}

fn run_init(store: &ConfigStore, json: bool) -> ProfileResult<()> {
    let report = initialize(store)?;
    if json {
        return print_json(&report);
    }

    println!("Profile store: {}", store.layout().models_dir().display());
    if report.base_created {
        println!(
            "Created base config: {}",
            store.layout().base_config().display()
        );
    }
    if !report.installed_profiles.is_empty() {
        println!(
            "Installed example profiles: {}",
            report.installed_profiles.join(", ")
        );
    }
    if !report.changed() {
        println!("Already initialized.");
    }
    Ok(())
}

fn run_switch(
    store: &ConfigStore,
    settings: &Settings,
    profile: &str,
    json: bool,
) -> ProfileResult<()> {
    let probe = TcpGatewayProbe::new(settings.gateway_port);
    let report = switch_profile(store, profile, &probe)?;
    if json {
        return print_json(&report);
    }

    if matches!(report.sync, SyncOutcome::Absorbed { .. }) {
        print_sync_outcome(&report.sync, store);
    }
    println!("Switched to profile '{}' ({})", report.profile, report.primary);
    if !report.providers.is_empty() {
        println!("  Providers: {}", report.providers.join(", "));
    }
    if report.restart_required {
        eprintln!(
            "Warning: the gateway is running on {}. Restart it to apply the new profile.",
            report.gateway
        );
    }
    Ok(())
}
