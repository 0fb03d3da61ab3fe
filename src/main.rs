use clap::{Parser, Subcommand};
use image_variants::{config, output, types};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-variants")]
#[command(about = "Declare and resolve versioned image format variants")]
#[command(long_about = "\
Declare and resolve versioned image format variants

Bundles are declared in formats.toml. Each bundle names a source image and
the variants derived from it; all bundles share one namespace:

  avatar          original      → avatar.jpg     (avatar-v3.jpg at version 3)
  avatar-thumb    100x100 webp  → avatar-thumb.webp

Run 'image-variants gen-config' to print a documented formats.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing formats.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log registry activity (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that resolve filenames.
#[derive(clap::Args, Clone)]
struct VersionArgs {
    /// Override every bundle's version (0 or less disables versioning)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    set_version: Option<i64>,
}

#[derive(Subcommand)]
enum Command {
    /// List every bundle with its resolved filenames
    List {
        #[command(flatten)]
        version: VersionArgs,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved filename of one format key
    Resolve {
        /// Bundle name or "<bundle>-<format>" key
        key: String,
        #[command(flatten)]
        version: VersionArgs,
    },
    /// Validate formats.toml without resolving
    Check,
    /// Print a stock formats.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::List { version, json } => {
            let bundles = load_bundles(&cli.config_dir, &version)?;
            let resolved = types::resolve_all(&bundles);
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                output::print_list_output(&resolved);
            }
        }
        Command::Resolve { key, version } => {
            let bundles = load_bundles(&cli.config_dir, &version)?;
            let filename = bundles
                .resolve(&key)
                .ok_or_else(|| format!("unknown format key '{key}'"))?;
            println!("{}", filename);
        }
        Command::Check => {
            let bundles = load_bundles(&cli.config_dir, &VersionArgs { set_version: None })?;
            output::print_check_output(&types::resolve_all(&bundles));
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_bundles(
    config_dir: &std::path::Path,
    version: &VersionArgs,
) -> Result<config::Bundles, config::ConfigError> {
    let formats = config::load_config(config_dir)?;
    tracing::debug!(bundles = formats.bundles.len(), "loaded config");
    let bundles = config::build_registries(&formats)?;
    if let Some(v) = version.set_version {
        bundles.set_version(Some(v));
    }
    Ok(bundles)
}
