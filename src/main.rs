use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use vyos_tailscale::settings::Settings;
use vyos_tailscale::sync::{SyncError, SyncOutcome};
use vyos_tailscale::{cfgtree, sync, TailscaleCli};

#[derive(Parser)]
#[command(name = "vyos-tailscale")]
#[command(about = "Sync the committed VyOS tailscale configuration to the tailscale client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Settings file (defaults to ./vyos-tailscale.toml, then
    /// /config/tailscale/vyos-tailscale.toml, then built-in defaults)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Query and parse the configuration but invoke nothing
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a default settings file
    Init {
        /// Where to write it
        #[arg(short, long, default_value = "vyos-tailscale.toml")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging goes to stderr so forwarded tailscale output on stdout
    // stays clean for the commit machinery.
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(Commands::Init { output }) = &cli.command {
        return match Settings::default().save(output) {
            Ok(()) => {
                println!("Created default settings: {}", output.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to write settings: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let settings = match Settings::load_or_default(cli.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Settings error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match cfgtree::fetch_config(&settings.query) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("An unexpected error occurred: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.dry_run {
        for line in sync::plan(&config) {
            println!("{line}");
        }
        return ExitCode::SUCCESS;
    }

    let client = TailscaleCli::new(&settings.client);
    match sync::synchronize(&client, &config) {
        Ok(SyncOutcome::NoConfig | SyncOutcome::LoggedOut) => ExitCode::SUCCESS,
        Ok(SyncOutcome::Applied { status_code }) => mirror(status_code),
        Err(SyncError::UpFailed { code, stderr }) => {
            if !stderr.is_empty() {
                eprint!("{stderr}");
            }
            mirror(code)
        }
        Err(e) => {
            eprintln!("An unexpected error occurred: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Maps a child's exit code onto ours. Signal terminations (no code)
/// mirror as a plain failure.
fn mirror(code: Option<i32>) -> ExitCode {
    match code {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    }
}
