//! CLI command for record generation

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::progress::{DISK, GEAR, LOOKING_GLASS, print_done, print_step};
use crate::config::GeneratorConfig;
use crate::generator::{GenerateRequest, generate};

/// Command-line settings that override the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// --base-dir
    pub base_dir: Option<PathBuf>,
    /// --config
    pub config: Option<PathBuf>,
    /// --lenient
    pub lenient: bool,
}

pub fn execute(
    output: &Path,
    locator: Option<&str>,
    templates: &Path,
    overrides: Overrides,
    show_progress: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();

    if show_progress {
        print_step(1, 3, LOOKING_GLASS, "Reading configuration...");
    }
    let mut config = match &overrides.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::discover(templates)?,
    };
    if let Some(base_dir) = overrides.base_dir {
        config.generation.base_dir = base_dir;
    }
    if overrides.lenient {
        config.generation.strict = false;
    }

    if show_progress {
        print_step(2, 3, GEAR, "Building records...");
    }
    let mut request = GenerateRequest::new(templates, output).with_config(config);
    if let Some(locator) = locator {
        request = request.with_locator(locator);
    }
    let report = generate(&request)?;

    if show_progress {
        print_step(3, 3, DISK, "Written:");
        for record in &report.records {
            println!("  {} ({} bytes)", record.path.display(), record.size);
        }
        if let Some(bundle) = &report.bundle {
            println!("  bundle dependency: {bundle}");
        }
        print_done(started.elapsed());
    }

    Ok(())
}
