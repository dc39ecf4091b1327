//! `spectra-resample` command-line interface.
//!
//! ```sh
//! spectra-resample run job.toml
//! spectra-resample run job.toml -o merged.csv
//! spectra-resample validate job.toml
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use spectra_resample::config::{self, JobConfig};
use spectra_resample::data::{loader, resample, writer};

#[derive(Parser)]
#[command(name = "spectra-resample")]
#[command(about = "Resample and merge spectra onto a common wavelength axis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every input, resample onto the axis, and write the merged dataset.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output file (overrides the config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a configuration file without reading any input.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            let job = config::load_config(&config)?;
            let output = output.unwrap_or_else(|| job.output.path.clone());
            run(&job, &output)
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let axis = job.validate()?;
            println!(
                "{}: {} input(s), {} axis points from {} to {}",
                config.display(),
                job.inputs.len(),
                axis.len(),
                axis[0],
                axis[axis.len() - 1]
            );
            Ok(())
        }
    }
}

fn run(job: &JobConfig, output: &std::path::Path) -> Result<()> {
    let axis = job.validate()?;

    let mut loaded = Vec::with_capacity(job.inputs.len());
    for input in &job.inputs {
        let dataset = loader::load_file(&input.path)?;
        loaded.push((input.label(), dataset));
    }

    let sources: Vec<(&str, &_)> = loaded
        .iter()
        .map(|(label, ds)| (label.as_str(), ds))
        .collect();
    let merged = resample::merge_datasets(&sources, &axis).context("merging inputs")?;

    writer::write_file(&merged, output)?;
    println!(
        "Resampled {} spectra onto {} wavelengths → {}",
        merged.len(),
        axis.len(),
        output.display()
    );
    Ok(())
}
