//! Writes two synthetic spectrometer datasets with overlapping but
//! differently sampled wavelength axes, plus a job file merging them.
//!
//! ```sh
//! cargo run --bin generate_sample
//! spectra-resample run sample_job.toml
//! ```

use std::path::Path;

use anyhow::{Context, Result};

use spectra_resample::data::model::{MetadataValue, SpectralDataset, Spectrum};
use spectra_resample::data::writer::write_file;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Emission lines shared by both instruments: (centre nm, width nm, height).
const LINES: [(f64, f64, f64); 4] = [
    (486.1, 4.0, 0.6),
    (589.3, 3.0, 1.0),
    (656.3, 5.0, 0.8),
    (763.0, 8.0, 0.4),
];

struct Instrument {
    name: &'static str,
    file: &'static str,
    /// Calibrated pixel wavelengths, as the device reports them.
    pixels: Vec<f64>,
    gain: f64,
}

/// Slightly non-linear pixel → wavelength calibration.
fn calibration(start: f64, stop: f64, n: usize, curvature: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            start + (stop - start) * (t + curvature * t * (1.0 - t))
        })
        .collect()
}

fn acquire(inst: &Instrument, scale: f64, rng: &mut SimpleRng) -> Vec<f64> {
    inst.pixels
        .iter()
        .map(|&wl| {
            let signal: f64 = LINES
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wl, mu, sigma, amp * scale))
                .sum();
            inst.gain * signal + rng.gauss(0.0, 0.004)
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let mut vis_pixels = calibration(350.0, 700.0, 2048, 0.05);
    // this device reports its axis red-to-blue
    vis_pixels.reverse();

    let instruments = [
        Instrument {
            name: "vis",
            file: "sample_vis.parquet",
            pixels: vis_pixels,
            gain: 1.0,
        },
        Instrument {
            name: "nir",
            file: "sample_nir.parquet",
            pixels: calibration(550.0, 1000.0, 512, -0.03),
            gain: 0.85,
        },
    ];
    let scales = [0.25, 0.5, 1.0, 2.0];

    for inst in &instruments {
        let spectra = scales
            .iter()
            .enumerate()
            .map(|(shot, &scale)| {
                Spectrum::new(inst.pixels.clone(), acquire(inst, scale, &mut rng))
                    .with_metadata("instrument", inst.name.into())
                    .with_metadata("shot", MetadataValue::Integer(shot as i64))
                    .with_metadata("concentration", MetadataValue::Float(scale))
            })
            .collect();
        let dataset = SpectralDataset::from_spectra(spectra);
        write_file(&dataset, Path::new(inst.file))?;
        println!(
            "Wrote {} spectra ({} pixels each) to {}",
            dataset.len(),
            inst.pixels.len(),
            inst.file
        );
    }

    let job = "\
[[input]]
path = \"sample_vis.parquet\"
label = \"vis\"

[[input]]
path = \"sample_nir.parquet\"
label = \"nir\"

[axis]
range = [400.0, 950.0]
points = 1101

[output]
path = \"sample_merged.parquet\"
";
    std::fs::write("sample_job.toml", job).context("writing sample_job.toml")?;
    println!("Wrote sample_job.toml");
    Ok(())
}
