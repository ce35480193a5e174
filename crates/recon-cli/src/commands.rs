// ─────────────────────────────────────────────────────────────────────
// Diff-Recon — CLI Commands
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use rand::rngs::StdRng;
use rand::SeedableRng;
use recon_data::loader::KSpaceVolume;
use recon_data::phantom::{phantom_volume, write_npz};
use recon_data::reconstruct::load_clean_image;
use recon_diffusion::scheduler::DiffusionScheduler;
use recon_types::config::ReconConfig;
use recon_types::error::{ReconError, ReconResult};
use recon_viz::figures::{comparison_figure, forward_figure, loader_figure};
use recon_viz::render::{save_png, FigureLayout};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default file name of the loader figure inside the output directory.
pub const LOADER_FILE: &str = "loader.png";

/// Default file name of the forward-noise strip inside the output directory.
pub const FORWARD_FILE: &str = "forward_diffusion.png";

/// Read `--config` if given, otherwise defaults.
pub fn load_config(path: Option<&str>) -> ReconResult<ReconConfig> {
    match path {
        Some(p) => {
            let cfg = ReconConfig::from_file(p)?;
            info!(path = p, "loaded config");
            Ok(cfg)
        }
        None => Ok(ReconConfig::default()),
    }
}

/// CLI flag wins over `data.path` in the config.
fn resolve_input(flag: Option<String>, cfg: &ReconConfig) -> ReconResult<String> {
    flag.or_else(|| cfg.data.path.clone()).ok_or_else(|| {
        ReconError::ConfigError(
            "no k-space archive given: pass --input or set data.path in the config".to_string(),
        )
    })
}

fn output_path(flag: Option<String>, cfg: &ReconConfig, default_name: &str) -> PathBuf {
    flag.map(PathBuf::from)
        .unwrap_or_else(|| Path::new(&cfg.output.dir).join(default_name))
}

/// k-space vs image comparison across masks, written to
/// `<output-dir>/<comparison_file>`.
pub fn run_visualize(
    mut cfg: ReconConfig,
    input: Option<String>,
    output_dir: Option<String>,
) -> ReconResult<PathBuf> {
    if let Some(dir) = output_dir {
        cfg.output.dir = dir;
    }
    cfg.validate()?;
    let input = resolve_input(input, &cfg)?;

    let volume = KSpaceVolume::open(&input, &cfg.data.kspace_key)?;
    let fig = comparison_figure(&volume.middle_slice(), &FigureLayout::default())?;
    let out = cfg.comparison_path();
    save_png(&fig, &out)?;
    Ok(out)
}

/// Loader view: log k-space next to the reconstruction of the middle slice.
pub fn run_load(
    cfg: ReconConfig,
    input: Option<String>,
    mask_outer: bool,
    output: Option<String>,
) -> ReconResult<PathBuf> {
    cfg.validate()?;
    let input = resolve_input(input, &cfg)?;

    let volume = KSpaceVolume::open(&input, &cfg.data.kspace_key)?;
    info!(
        slices = volume.n_slices(),
        slice_dim = ?volume.slice_dim(),
        mask_outer,
        "loader"
    );
    let fig = loader_figure(&volume.middle_slice(), mask_outer, &FigureLayout::default())?;
    let out = output_path(output, &cfg, LOADER_FILE);
    save_png(&fig, &out)?;
    Ok(out)
}

/// Forward-noise strip of the clean middle slice at each requested step.
pub fn run_forward(
    mut cfg: ReconConfig,
    input: Option<String>,
    steps: Option<Vec<usize>>,
    seed: Option<u64>,
    output: Option<String>,
) -> ReconResult<PathBuf> {
    if let Some(steps) = steps {
        cfg.forward.steps = steps;
    }
    if seed.is_some() {
        cfg.forward.seed = seed;
    }
    cfg.validate()?;
    let input = resolve_input(input, &cfg)?;

    let clean = load_clean_image(&input, &cfg.data.kspace_key)?;
    let scheduler = DiffusionScheduler::from_config(&cfg.scheduler)?;
    let mut rng = match cfg.forward.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => {
            warn!("no seed configured, forward figure will not be reproducible");
            StdRng::from_entropy()
        }
    };

    let fig = forward_figure(
        &clean,
        &scheduler,
        &cfg.forward.steps,
        &mut rng,
        &FigureLayout::default(),
    )?;
    let out = output_path(output, &cfg, FORWARD_FILE);
    save_png(&fig, &out)?;
    Ok(out)
}

/// Write a synthetic phantom k-space archive.
pub fn run_phantom(
    cfg: ReconConfig,
    output: &str,
    slices: usize,
    rows: usize,
    cols: usize,
) -> ReconResult<PathBuf> {
    cfg.validate()?;
    let volume = phantom_volume(slices, rows, cols)?;
    write_npz(output, &cfg.data.kspace_key, &volume)?;
    Ok(PathBuf::from(output))
}
