//! Integration test: two instruments with different, differently ordered
//! axes are merged onto one ascending axis through the file layer.

use spectra_resample::config::parse_config;
use spectra_resample::data::loader::load_file;
use spectra_resample::data::model::{MetadataValue, SpectralDataset, Spectrum};
use spectra_resample::data::resample::{merge_datasets, SOURCE_COLUMN};
use spectra_resample::data::writer::write_file;

fn line(wl: f64) -> f64 {
    2.0 * wl - 700.0
}

#[test]
fn merges_two_instruments_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    // Descending axis, as some spectrometers report it.
    let vis_x: Vec<f64> = (0..=40).rev().map(|i| 400.0 + i as f64 * 5.0).collect();
    let vis = SpectralDataset::from_spectra(vec![Spectrum::new(
        vis_x.clone(),
        vis_x.iter().map(|&w| line(w)).collect(),
    )
    .with_metadata("exposure_ms", MetadataValue::Integer(10))]);

    let nir_x: Vec<f64> = (0..=20).map(|i| 550.0 + i as f64 * 17.5).collect();
    let nir = SpectralDataset::from_spectra(vec![Spectrum::new(
        nir_x.clone(),
        nir_x.iter().map(|&w| line(w)).collect(),
    )]);

    let vis_path = dir.path().join("vis.csv");
    let nir_path = dir.path().join("nir.parquet");
    write_file(&vis, &vis_path).unwrap();
    write_file(&nir, &nir_path).unwrap();

    let job = parse_config(&format!(
        r#"
        [[input]]
        path = "{}"
        label = "vis"

        [[input]]
        path = "{}"

        [axis]
        range = [450.0, 650.0]
        points = 41
        "#,
        vis_path.display(),
        nir_path.display()
    ))
    .unwrap();
    let axis = job.validate().unwrap();

    let loaded: Vec<(String, SpectralDataset)> = job
        .inputs
        .iter()
        .map(|input| (input.label(), load_file(&input.path).unwrap()))
        .collect();
    let sources: Vec<(&str, &SpectralDataset)> =
        loaded.iter().map(|(l, d)| (l.as_str(), d)).collect();
    let merged = merge_datasets(&sources, &axis).unwrap();

    let out_path = dir.path().join("merged.json");
    write_file(&merged, &out_path).unwrap();
    let back = load_file(&out_path).unwrap();

    assert_eq!(back.len(), 2);
    let labels: Vec<_> = back
        .spectra
        .iter()
        .map(|sp| sp.metadata[SOURCE_COLUMN].clone())
        .collect();
    assert_eq!(
        labels,
        vec![
            MetadataValue::String("vis".into()),
            MetadataValue::String("nir".into())
        ]
    );

    // A straight line resamples exactly inside each instrument's range
    // and clamps outside it.
    for (i, &w) in axis.iter().enumerate() {
        let vis_y = back.spectra[0].y[i];
        assert!((vis_y - line(w.min(600.0))).abs() < 1e-9, "vis at {w}: {vis_y}");

        let nir_y = back.spectra[1].y[i];
        let expected = line(w.max(550.0));
        assert!((nir_y - expected).abs() < 1e-9, "nir at {w}: {nir_y}");
    }
}
