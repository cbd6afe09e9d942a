use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slidecraft::config::DeploymentMode;

/// Parse output format from string
fn parse_format(s: &str) -> Result<String, String> {
    match s.to_lowercase().as_str() {
        "text" | "json" => Ok(s.to_lowercase()),
        _ => Err(format!("Invalid format '{}'. Valid values: text, json", s)),
    }
}

/// Parse deployment mode from string
fn parse_deployment_mode(s: &str) -> Result<DeploymentMode, String> {
    s.parse()
}

/// Parse config output format from string
fn parse_config_format(s: &str) -> Result<String, String> {
    match s.to_lowercase().as_str() {
        "toml" | "json" => Ok(s.to_lowercase()),
        _ => Err(format!("Invalid format '{}'. Valid values: toml, json", s)),
    }
}

#[derive(Parser)]
#[command(name = "slidecraft")]
#[command(version, about = "Turn free text into presentation slides")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse text into slides
    Parse {
        #[arg(help = "Input file (reads stdin when omitted)")]
        file: Option<PathBuf>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            value_parser = parse_format,
            help = "Output format: text, json"
        )]
        format: String,
        #[arg(long, value_parser = parse_deployment_mode, help = "Deployment mode: production, development")]
        deployment: Option<DeploymentMode>,
    },

    /// Run the HTTP API
    Serve {
        #[arg(long, help = "Bind address (default from config)")]
        host: Option<String>,
        #[arg(long, short, help = "Port (default from config)")]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            value_parser = parse_config_format,
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mSlidecraft encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // RUST_BACKTRACE=1 still works through the default hook
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Parse {
            file,
            format,
            deployment,
        } => {
            slidecraft::cli::commands::parse::run(slidecraft::cli::commands::parse::ParseOptions {
                file,
                format,
                deployment,
            })?;
        }
        Commands::Serve { host, port } => {
            slidecraft::cli::commands::serve::run(host, port)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                slidecraft::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                slidecraft::cli::commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                slidecraft::cli::commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
