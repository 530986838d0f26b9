// # ipwatch - tick-driven dynamic-DNS reconciler
//
// One invocation performs one reconciliation tick; scheduling is left to
// cron or a systemd timer. The binary is a thin integration layer: it reads
// ambient configuration, wires the concrete components together, runs the
// core state machine once, and maps the terminal outcome to an exit code.
//
// ## Configuration
//
// Ambient settings come from environment variables:
//
// - `IPWATCH_STATE_DIR`: Directory for the persisted documents (default ".")
// - `IPWATCH_LOOKUP_URL`: Plain-text "what is my IP" service
//   (default https://api.ipify.org)
// - `IPWATCH_PROVIDER_HOST`: dyndns2 provider API host
//   (default domains.google.com)
// - `IPWATCH_HTTP_TIMEOUT_SECS`: Connect/read timeout (default 10)
// - `IPWATCH_LOG_LEVEL`: trace|debug|info|warn|error (default info)
//
// Credentials are NOT configured through the environment; they live in the
// state directory and are created interactively, or imported with the
// `import` subcommand.
//
// ## Exit codes
//
// - 0: success or no-op
// - 1: network unreachable (or the provider did not answer)
// - 2: malformed arguments, missing profile, or a bad-host/auth failure
//      requiring manual intervention

mod notify;
mod prompt;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use ipwatch_core::config::{ProviderConfig, ResolverConfig, StoreConfig};
use ipwatch_core::traits::StateStore;
use ipwatch_core::{
    CredentialProfile, DeclinePrompt, Error, FileStore, Reconciler, TickReport,
};
use ipwatch_ip_http::HttpIpResolver;
use ipwatch_provider_dyndns2::Dyndns2Client;

#[derive(Parser, Debug)]
#[command(name = "ipwatch")]
#[command(about = "Keep a dynamic-DNS record pointed at this host's public IP")]
struct Args {
    /// Never prompt; credential re-entry offers are auto-declined
    #[arg(long)]
    unattended: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace the stored API credentials
    Credentials,
    /// Cycle the notification preference (all -> errors only -> none)
    Notifications,
    /// Delete the stored credential profile
    Delete,
    /// Load a credential profile from a JSON file, replacing any current one
    Import {
        /// Path to the profile document
        path: PathBuf,
    },
}

/// Exit codes for the documented CLI contract
///
/// clap itself exits with 2 on malformed arguments, which lands in the
/// same manual-intervention class.
#[derive(Debug, Clone, Copy)]
enum AppExitCode {
    /// Success or no-op
    Success = 0,
    /// Network unreachable, or no answer from the provider
    NetworkUnreachable = 1,
    /// Misconfiguration that a scheduler retry will not fix
    ManualIntervention = 2,
}

impl From<AppExitCode> for ExitCode {
    fn from(code: AppExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Ambient configuration, environment-only
struct Config {
    resolver: ResolverConfig,
    provider: ProviderConfig,
    store: StoreConfig,
    log_level: String,
}

impl Config {
    fn from_env() -> Self {
        let timeout_secs = env::var("IPWATCH_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let mut resolver = ResolverConfig::default();
        if let Ok(url) = env::var("IPWATCH_LOOKUP_URL") {
            resolver.url = url;
        }
        resolver.timeout_secs = timeout_secs;

        let mut provider = ProviderConfig::default();
        if let Ok(host) = env::var("IPWATCH_PROVIDER_HOST") {
            provider.host = host;
        }
        provider.timeout_secs = timeout_secs;

        let store = StoreConfig {
            dir: env::var("IPWATCH_STATE_DIR").unwrap_or_else(|_| ".".to_string()),
        };

        Self {
            resolver,
            provider,
            store,
            log_level: env::var("IPWATCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    fn validate(&self) -> Result<()> {
        self.resolver.validate()?;
        self.provider.validate()?;
        self.store.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "IPWATCH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return AppExitCode::ManualIntervention.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AppExitCode::ManualIntervention.into();
    }

    // One tick is strictly sequential; a single-threaded runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AppExitCode::ManualIntervention.into();
        }
    };

    rt.block_on(run(args, config)).into()
}

async fn run(args: Args, config: Config) -> AppExitCode {
    let store = match FileStore::new(&config.store.dir).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open state directory: {}", e);
            return AppExitCode::ManualIntervention;
        }
    };

    match args.command {
        Some(Command::Credentials) => change_credentials(&store, &config, args.unattended).await,
        Some(Command::Notifications) => toggle_notifications(&store, args.unattended).await,
        Some(Command::Delete) => delete_profile(&store).await,
        Some(Command::Import { path }) => import_profile(&store, &path).await,
        None => run_tick(&store, &config, args.unattended).await,
    }
}

/// Default invocation: one reconciliation tick
async fn run_tick(store: &FileStore, config: &Config, unattended: bool) -> AppExitCode {
    if let Err(code) = ensure_profile(store, config, unattended).await {
        return code;
    }

    let resolver = match HttpIpResolver::from_config(&config.resolver) {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("{}", e);
            return AppExitCode::ManualIntervention;
        }
    };
    let provider = match Dyndns2Client::from_config(&config.provider) {
        Ok(provider) => provider,
        Err(e) => {
            error!("{}", e);
            return AppExitCode::ManualIntervention;
        }
    };
    let prompt: Box<dyn ipwatch_core::CredentialPrompt> = if unattended {
        Box::new(DeclinePrompt)
    } else {
        Box::new(prompt::InteractivePrompt::new(config.provider.host.clone()))
    };

    let reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider),
        Box::new(store.clone()),
        Box::new(notify::LogNotifier),
        prompt,
    );

    match reconciler.run_tick().await {
        Ok(report) => match report {
            TickReport::NoChange { .. } | TickReport::Updated { .. } => AppExitCode::Success,
            TickReport::TransientFailure { .. } => AppExitCode::NetworkUnreachable,
            TickReport::BadHost { .. } | TickReport::AuthFailed { .. } => {
                AppExitCode::ManualIntervention
            }
        },
        Err(Error::NetworkUnavailable(detail)) => {
            warn!("Connection error: {}", detail);
            AppExitCode::NetworkUnreachable
        }
        Err(e) => {
            error!("{}", e);
            AppExitCode::ManualIntervention
        }
    }
}

/// Create the credential profile on first run (attended invocations only)
async fn ensure_profile(
    store: &FileStore,
    config: &Config,
    unattended: bool,
) -> Result<(), AppExitCode> {
    let existing = match store.load_profile().await {
        Ok(profile) => profile,
        Err(Error::CorruptState(detail)) => {
            warn!("profile unreadable, it must be recreated: {}", detail);
            None
        }
        Err(e) => {
            error!("{}", e);
            return Err(AppExitCode::ManualIntervention);
        }
    };
    if existing.is_some() {
        return Ok(());
    }

    if unattended {
        error!(
            "No credential profile stored. Run `ipwatch` interactively to create one, \
             or `ipwatch import <path>` to load one from file."
        );
        return Err(AppExitCode::ManualIntervention);
    }

    let profile = match prompt::collect_profile(&config.provider.host) {
        Ok(profile) => profile,
        Err(e) => {
            error!("{}", e);
            return Err(AppExitCode::ManualIntervention);
        }
    };
    let settings = match prompt::collect_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            return Err(AppExitCode::ManualIntervention);
        }
    };

    if let Err(e) = store.save_profile(&profile).await {
        error!("{}", e);
        return Err(AppExitCode::ManualIntervention);
    }
    if let Err(e) = store.save_settings(&settings).await {
        error!("{}", e);
        return Err(AppExitCode::ManualIntervention);
    }

    info!("New profile created. (See `ipwatch --help` for changing or removing it)");
    Ok(())
}

async fn change_credentials(store: &FileStore, config: &Config, unattended: bool) -> AppExitCode {
    if unattended {
        error!("`credentials` is interactive and cannot run with --unattended");
        return AppExitCode::ManualIntervention;
    }

    let profile = match prompt::collect_profile(&config.provider.host) {
        Ok(profile) => profile,
        Err(e) => {
            error!("{}", e);
            return AppExitCode::ManualIntervention;
        }
    };

    if let Err(e) = store.save_profile(&profile).await {
        error!("{}", e);
        return AppExitCode::ManualIntervention;
    }

    info!("***API credentials changed***");
    AppExitCode::Success
}

async fn toggle_notifications(store: &FileStore, unattended: bool) -> AppExitCode {
    let mut settings = match store.load_settings().await {
        Ok(settings) => settings,
        Err(Error::CorruptState(detail)) => {
            warn!("settings unreadable, starting from defaults: {}", detail);
            Default::default()
        }
        Err(e) => {
            error!("{}", e);
            return AppExitCode::ManualIntervention;
        }
    };

    settings.preference = settings.preference.cycle();

    // Enabling notifications without a recipient configured asks for one
    if settings.preference.wants_errors() && settings.recipient.is_none() && !unattended {
        info!("No notification recipient set, running setup...");
        match prompt::collect_settings() {
            Ok(collected) => settings = collected,
            Err(e) => {
                error!("{}", e);
                return AppExitCode::ManualIntervention;
            }
        }
    }

    if let Err(e) = store.save_settings(&settings).await {
        error!("{}", e);
        return AppExitCode::ManualIntervention;
    }

    info!(
        "***Notification settings changed to [{}]***",
        settings.preference.label()
    );
    AppExitCode::Success
}

async fn delete_profile(store: &FileStore) -> AppExitCode {
    if let Err(e) = store.delete_profile().await {
        error!("{}", e);
        return AppExitCode::ManualIntervention;
    }

    info!("***Profile deleted***");
    println!(
        ">>> Run `ipwatch` without options to create a new profile, \
         or `ipwatch import <path>` to load one from file"
    );
    AppExitCode::Success
}

async fn import_profile(store: &FileStore, path: &std::path::Path) -> AppExitCode {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("{}: {}", path.display(), e);
            return AppExitCode::ManualIntervention;
        }
    };

    let profile: CredentialProfile = match serde_json::from_str(&content) {
        Ok(profile) => profile,
        Err(e) => {
            error!("{} is not a valid profile document: {}", path.display(), e);
            return AppExitCode::ManualIntervention;
        }
    };

    if let Err(e) = ipwatch_core::profile::validate_domain_name(&profile.domain) {
        error!("{}", e);
        return AppExitCode::ManualIntervention;
    }

    if let Err(e) = store.save_profile(&profile).await {
        error!("{}", e);
        return AppExitCode::ManualIntervention;
    }

    info!("***Profile loaded for {}***", profile.domain);
    AppExitCode::Success
}
