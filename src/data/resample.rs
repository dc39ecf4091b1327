use std::sync::Arc;

use anyhow::{Context, Result};

use super::model::{MetadataValue, SpectralDataset, Spectrum};
use crate::interp::{SequentialInterpolator, WavelengthTable};

/// Metadata column that records which input a merged spectrum came from.
pub const SOURCE_COLUMN: &str = "source";

/// Resample one spectrum onto `axis`. Metadata is carried over unchanged.
pub fn resample_spectrum(spectrum: &Spectrum, axis: &[f64]) -> Result<Spectrum> {
    let table = Arc::new(WavelengthTable::from_spectrum(spectrum)?);
    let mut interp = SequentialInterpolator::new(table);
    Ok(Spectrum {
        x: axis.to_vec(),
        y: interp.resample(axis),
        metadata: spectrum.metadata.clone(),
    })
}

/// Resample every spectrum of a dataset onto `axis`, each with its own
/// interpolator.
pub fn resample_dataset(dataset: &SpectralDataset, axis: &[f64]) -> Result<SpectralDataset> {
    let spectra = dataset
        .spectra
        .iter()
        .enumerate()
        .map(|(row, sp)| resample_spectrum(sp, axis).with_context(|| format!("Row {row}")))
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "resampled {} spectra onto {} wavelengths",
        spectra.len(),
        axis.len()
    );
    Ok(SpectralDataset::from_spectra(spectra))
}

/// Put several datasets (e.g. two spectrometers with overlapping ranges)
/// on a common axis and stack them, tagging each row with its source
/// label in [`SOURCE_COLUMN`].
pub fn merge_datasets(sources: &[(&str, &SpectralDataset)], axis: &[f64]) -> Result<SpectralDataset> {
    let mut merged = Vec::new();
    for (label, dataset) in sources {
        let resampled =
            resample_dataset(dataset, axis).with_context(|| format!("resampling '{label}'"))?;
        merged.extend(resampled.spectra.into_iter().map(|sp| {
            sp.with_metadata(SOURCE_COLUMN, MetadataValue::String(label.to_string()))
        }));
    }
    Ok(SpectralDataset::from_spectra(merged))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uv() -> SpectralDataset {
        SpectralDataset::from_spectra(vec![Spectrum::new(
            vec![420.0, 410.0, 400.0],
            vec![15.0, 20.0, 10.0],
        )
        .with_metadata("exposure_ms", MetadataValue::Integer(5))])
    }

    fn nir() -> SpectralDataset {
        SpectralDataset::from_spectra(vec![
            Spectrum::new(vec![410.0, 430.0], vec![1.0, 3.0]),
            Spectrum::new(vec![410.0, 430.0], vec![2.0, 2.0])
                .with_metadata(SOURCE_COLUMN, "stale".into()),
        ])
    }

    #[test]
    fn spectrum_is_resampled_with_clamping() {
        let out = resample_spectrum(&uv().spectra[0], &[390.0, 405.0, 415.0, 500.0]).unwrap();
        assert_eq!(out.x, vec![390.0, 405.0, 415.0, 500.0]);
        assert_eq!(out.y, vec![10.0, 15.0, 17.5, 15.0]);
        assert_eq!(out.metadata["exposure_ms"], MetadataValue::Integer(5));
    }

    #[test]
    fn empty_spectrum_reports_row() {
        let ds = SpectralDataset::from_spectra(vec![
            Spectrum::new(vec![1.0], vec![1.0]),
            Spectrum::new(vec![], vec![]),
        ]);
        let err = resample_dataset(&ds, &[1.0]).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Row 1"), "{msg}");
        assert!(msg.contains("no points"), "{msg}");
    }

    #[test]
    fn merge_tags_sources_and_shares_axis() {
        let axis = [400.0, 410.0, 420.0, 430.0];
        let uv = uv();
        let nir = nir();
        let merged = merge_datasets(&[("uv", &uv), ("nir", &nir)], &axis).unwrap();

        assert_eq!(merged.len(), 3);
        assert!(merged.spectra.iter().all(|sp| sp.x == axis));
        let labels: Vec<String> = merged
            .spectra
            .iter()
            .map(|sp| sp.metadata[SOURCE_COLUMN].to_string())
            .collect();
        assert_eq!(labels, vec!["uv", "nir", "nir"]);

        assert_eq!(merged.spectra[0].y, vec![10.0, 20.0, 15.0, 15.0]);
        assert_eq!(merged.spectra[1].y, vec![1.0, 1.0, 2.0, 3.0]);
        assert_eq!(
            merged.column_names,
            vec!["exposure_ms".to_string(), SOURCE_COLUMN.to_string()]
        );
    }
}
