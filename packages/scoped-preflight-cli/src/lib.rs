#![deny(clippy::all)]

//! Scoped Preflight CLI
//!
//! Loads one or more JSON configuration files, rewrites the baseline reset
//! (or a given stylesheet) for each of them and writes the results out.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use scoped_preflight::{RewriteStats, ScopedPreflight};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SCOPED_PREFLIGHT_LOG";

/// Configuration file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "scoped-preflight.json";

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Installs the stderr log subscriber. `verbose` wins over the environment.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub configs: Vec<PathBuf>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// A parsed configuration file.
#[derive(Debug)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub plugin: ScopedPreflight,
    /// The file's own `output` key, resolved against its directory.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

#[derive(Debug)]
pub struct JobOutput {
    pub config: PathBuf,
    pub destination: Destination,
    pub css: String,
    pub stats: RewriteStats,
}

pub fn load_config(path: &Path) -> Result<LoadedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("invalid JSON in {}", path.display()))?;

    let output = value
        .get("output")
        .and_then(Value::as_str)
        .map(|output| match path.parent() {
            Some(dir) => dir.join(output),
            None => PathBuf::from(output),
        });
    let plugin = ScopedPreflight::from_json_value(value)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;

    debug!(config = %path.display(), strategy = plugin.strategy().name(), "Config loaded");
    Ok(LoadedConfig {
        path: path.to_path_buf(),
        plugin,
        output,
    })
}

/// Rewrites `input` (the embedded baseline when `None`) for one config.
pub fn rewrite(config: &LoadedConfig, input: Option<&str>) -> Result<(String, RewriteStats)> {
    let stylesheet = match input {
        Some(css) => scoped_preflight::parse_stylesheet(css)
            .with_context(|| format!("failed to parse input for {}", config.path.display()))?,
        None => scoped_preflight::preflight::baseline_stylesheet(),
    };
    let rewritten = config.plugin.rewrite_with_stats(stylesheet);
    Ok((
        scoped_preflight::css_ast::nodes_to_css(&rewritten.nodes),
        rewritten.stats,
    ))
}

fn resolve_configs(options: &RunOptions) -> Result<Vec<PathBuf>> {
    if !options.configs.is_empty() {
        return Ok(options.configs.clone());
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
    if fallback.exists() {
        return Ok(vec![fallback]);
    }
    bail!(
        "no configuration given and no {} in the working directory",
        DEFAULT_CONFIG_FILE
    )
}

/// Loads and rewrites every config. Configs are independent and run in
/// parallel; results keep the order of `options.configs`. An explicit
/// `output` wins over the config file's own `output` key.
pub fn run(options: &RunOptions) -> Result<Vec<JobOutput>> {
    let configs = resolve_configs(options)?;
    if options.output.is_some() && configs.len() > 1 {
        bail!("--output can only be used with a single config; set \"output\" in each config instead");
    }

    let input = match &options.input {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read input {}", path.display()))?,
        ),
        None => None,
    };

    configs
        .par_iter()
        .map(|path| -> Result<JobOutput> {
            let config = load_config(path)?;
            let (css, stats) = rewrite(&config, input.as_deref())?;
            let destination = match (&options.output, config.output) {
                (Some(output), own) => {
                    if let Some(own) = own {
                        info!(
                            config = %path.display(),
                            replaced = %own.display(),
                            output = %output.display(),
                            "--output overrides the config's own output"
                        );
                    }
                    Destination::File(output.clone())
                }
                (None, Some(own)) => Destination::File(own),
                (None, None) => Destination::Stdout,
            };
            Ok(JobOutput {
                config: config.path,
                destination,
                css,
                stats,
            })
        })
        .collect()
}

/// Writes every result to its destination. Stdout results are concatenated
/// in config order.
pub fn write_outputs(outputs: &[JobOutput]) -> Result<()> {
    let mut stdout = String::new();
    for output in outputs {
        match &output.destination {
            Destination::File(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    fs::create_dir_all(dir)
                        .with_context(|| format!("failed to create {}", dir.display()))?;
                }
                fs::write(path, &output.css)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(
                    config = %output.config.display(),
                    output = %path.display(),
                    rules = output.stats.rules,
                    rules_dropped = output.stats.rules_dropped,
                    "Scoped preflight written"
                );
            }
            Destination::Stdout => stdout.push_str(&output.css),
        }
    }
    if !stdout.is_empty() {
        print!("{}", stdout);
    }
    Ok(())
}
