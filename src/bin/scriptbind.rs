//! Command-line front end.
//!
//! ```text
//! scriptbind cocos2d.xml bindings --config bindings.toml --class CCNode --class CCSprite
//! ```
//!
//! Writes `<prefix>.hpp` and `<prefix>.cpp`, keeping the previous artifacts
//! as `<prefix>.old.hpp` and `<prefix>.old.cpp`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use scriptbind::{BindingGenerator, GenerationOutput, GeneratorConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "scriptbind", version, about = "Generate script bindings from analyzer XML")]
struct Cli {
    /// Analyzer XML document.
    input: PathBuf,

    /// Output path prefix; overrides the configuration.
    out_prefix: Option<String>,

    /// TOML configuration file.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Class to bind (repeatable); replaces the configured allow list.
    #[arg(long = "class", value_name = "NAME")]
    classes: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let prefix = config.output_prefix.clone();

    let xml = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let output = BindingGenerator::new(config)
        .generate_xml(&xml)
        .with_context(|| format!("failed to generate bindings for {}", cli.input.display()))?;

    for diagnostic in &output.diagnostics {
        warn!("{diagnostic}");
    }
    write_artifacts(&prefix, &output)?;
    info!(
        classes = output.classes.len(),
        errors = output.error_count(),
        "wrote {prefix}.hpp and {prefix}.cpp"
    );
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_path(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(prefix) = &cli.out_prefix {
        config = config.with_output_prefix(prefix.as_str());
    }
    if !cli.classes.is_empty() {
        config = config.with_allow_list(cli.classes.iter().cloned());
    }
    Ok(config)
}

/// Back up existing artifacts, then write the new ones.
fn write_artifacts(prefix: &str, output: &GenerationOutput) -> Result<()> {
    for (ext, contents) in [("hpp", &output.header), ("cpp", &output.implementation)] {
        let path = PathBuf::from(format!("{prefix}.{ext}"));
        backup(&path, &PathBuf::from(format!("{prefix}.old.{ext}")))?;
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn backup(path: &Path, backup: &Path) -> Result<()> {
    if path.exists() {
        fs::copy(path, backup).with_context(|| {
            format!("failed to back up {} to {}", path.display(), backup.display())
        })?;
    }
    Ok(())
}
