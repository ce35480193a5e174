// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — diffrecon binary
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use clap::{Parser, Subcommand};
use recon_cli::{commands, logging};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Diff-Recon - k-space inspection and forward diffusion for MRI reconstruction
#[derive(Parser)]
#[command(name = "diffrecon")]
#[command(version)]
#[command(about = "k-space figures, loader view and forward-diffusion strips for MRI slices")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON run configuration
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the k-space vs image comparison (none / low_pass / high_pass)
    Visualize {
        /// k-space archive (.npz or .npy)
        #[arg(short, long)]
        input: Option<String>,
        /// Directory for the comparison figure
        #[arg(long)]
        output_dir: Option<String>,
    },
    /// Show the middle slice: log k-space next to its reconstruction
    Load {
        #[arg(short, long)]
        input: Option<String>,
        /// Zero the outer 50% of k-space before reconstructing
        #[arg(long)]
        mask_outer: bool,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Noise the clean slice at several diffusion timesteps
    Forward {
        #[arg(short, long)]
        input: Option<String>,
        /// Comma-separated timesteps, e.g. 0,50,150,400,999
        #[arg(long, value_delimiter = ',')]
        steps: Option<Vec<usize>>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Write a synthetic Shepp-Logan k-space archive
    Phantom {
        #[arg(short, long)]
        output: String,
        #[arg(long, default_value_t = 5)]
        slices: usize,
        #[arg(long, default_value_t = 320)]
        rows: usize,
        #[arg(long, default_value_t = 320)]
        cols: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = logging::log_filter(cli.verbose, rust_log.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let result = commands::load_config(cli.config.as_deref()).and_then(|cfg| match cli.command {
        Commands::Visualize { input, output_dir } => {
            commands::run_visualize(cfg, input, output_dir)
        }
        Commands::Load {
            input,
            mask_outer,
            output,
        } => commands::run_load(cfg, input, mask_outer, output),
        Commands::Forward {
            input,
            steps,
            seed,
            output,
        } => commands::run_forward(cfg, input, steps, seed, output),
        Commands::Phantom {
            output,
            slices,
            rows,
            cols,
        } => commands::run_phantom(cfg, &output, slices, rows, cols),
    });

    match result {
        Ok(path) => {
            info!(path = %path.display(), "done");
            println!("{}", path.display());
        }
        Err(e) => {
            error!("{e}");
            eprintln!("diffrecon: {e}");
            std::process::exit(1);
        }
    }
}
