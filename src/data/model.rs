use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// MetadataValue – a single metadata cell carried alongside a spectrum
// ---------------------------------------------------------------------------

/// A dynamically-typed metadata value (instrument name, integration time,
/// sample id, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl MetadataValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetadataValue::Null)
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v:.4}"),
            MetadataValue::Bool(b) => write!(f, "{b}"),
            MetadataValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Spectrum – one measurement
// ---------------------------------------------------------------------------

/// One measured spectrum: parallel wavelength / intensity vectors plus
/// metadata. The x axis may be in any order.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Wavelength axis (x).
    pub x: Vec<f64>,
    /// Intensity axis (y), same length as `x`.
    pub y: Vec<f64>,
    /// Metadata columns: column_name → value.
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl Spectrum {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Spectrum {
            x,
            y,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, column: &str, value: MetadataValue) -> Self {
        self.metadata.insert(column.to_string(), value);
        self
    }
}

// ---------------------------------------------------------------------------
// SpectralDataset – a file's worth of spectra
// ---------------------------------------------------------------------------

/// A collection of spectra with the union of their metadata columns.
#[derive(Debug, Clone, Default)]
pub struct SpectralDataset {
    pub spectra: Vec<Spectrum>,
    /// Sorted metadata column names (excludes x, y).
    pub column_names: Vec<String>,
}

impl SpectralDataset {
    /// Collect the metadata column index from the given spectra.
    pub fn from_spectra(spectra: Vec<Spectrum>) -> Self {
        let columns: BTreeSet<&String> = spectra
            .iter()
            .flat_map(|sp| sp.metadata.keys())
            .collect();
        let column_names = columns.into_iter().cloned().collect();
        SpectralDataset {
            spectra,
            column_names,
        }
    }

    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }
}
