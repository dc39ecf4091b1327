/// Data layer: spectra, file formats, and resampling onto a common axis.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → SpectralDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resample │  one SequentialInterpolator per spectrum → common axis
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer  │  SpectralDataset → .parquet / .json / .csv
///   └──────────┘
/// ```

pub mod format;
pub mod loader;
pub mod model;
pub mod resample;
pub mod writer;
