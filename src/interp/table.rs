use std::collections::HashMap;

use thiserror::Error;

use crate::data::model::Spectrum;

// ---------------------------------------------------------------------------
// Construction errors
// ---------------------------------------------------------------------------

/// Reasons a spectrum cannot be turned into a [`WavelengthTable`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpError {
    #[error("spectrum has no points")]
    EmptySpectrum,
    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },
    #[error("wavelength at index {index} is not finite ({value})")]
    NonFiniteWavelength { index: usize, value: f64 },
    #[error("wavelength {0} appears more than once")]
    DuplicateWavelength(f64),
}

// ---------------------------------------------------------------------------
// WavelengthTable – immutable sorted snapshot of a spectrum
// ---------------------------------------------------------------------------

/// Sorted snapshot of a spectrum, built once and never mutated.
///
/// `wavelengths` is strictly increasing and `intensities[i]` belongs to
/// `wavelengths[i]`. The first and last wavelengths are cached for the
/// clamp tests, and `index` gives exact-key lookup in O(1).
#[derive(Debug, Clone)]
pub struct WavelengthTable {
    wavelengths: Vec<f64>,
    intensities: Vec<f64>,
    first: f64,
    last: f64,
    index: HashMap<u64, usize>,
}

/// Hash key for exact wavelength matching. `-0.0` and `0.0` compare equal
/// as floats so they must share a key.
pub(crate) fn exact_key(wavelength: f64) -> u64 {
    if wavelength == 0.0 {
        0.0f64.to_bits()
    } else {
        wavelength.to_bits()
    }
}

impl WavelengthTable {
    /// Build a table from `(wavelength, intensity)` pairs in any order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, InterpError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut points: Vec<(f64, f64)> = pairs.into_iter().collect();
        if points.is_empty() {
            return Err(InterpError::EmptySpectrum);
        }
        if let Some((index, &(value, _))) = points
            .iter()
            .enumerate()
            .find(|(_, (wl, _))| !wl.is_finite())
        {
            return Err(InterpError::NonFiniteWavelength { index, value });
        }

        // All keys are finite here, so total_cmp agrees with `<`.
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(pair) = points.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(InterpError::DuplicateWavelength(pair[0].0));
        }

        let (wavelengths, intensities): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        let index = wavelengths
            .iter()
            .enumerate()
            .map(|(i, &wl)| (exact_key(wl), i))
            .collect();

        Ok(WavelengthTable {
            first: wavelengths[0],
            last: wavelengths[wavelengths.len() - 1],
            wavelengths,
            intensities,
            index,
        })
    }

    /// Build a table from parallel wavelength / intensity slices.
    pub fn from_xy(x: &[f64], y: &[f64]) -> Result<Self, InterpError> {
        if x.len() != y.len() {
            return Err(InterpError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        Self::from_pairs(x.iter().copied().zip(y.iter().copied()))
    }

    pub fn from_spectrum(spectrum: &Spectrum) -> Result<Self, InterpError> {
        Self::from_xy(&spectrum.x, &spectrum.y)
    }

    /// Number of pixels (distinct wavelengths).
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    /// Always false: construction rejects empty spectra.
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn first_wavelength(&self) -> f64 {
        self.first
    }

    pub fn last_wavelength(&self) -> f64 {
        self.last
    }

    /// Sorted wavelengths, strictly increasing.
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    /// Intensities in wavelength order.
    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Table position of a wavelength that is exactly present.
    pub fn position_of(&self, wavelength: f64) -> Option<usize> {
        self.index.get(&exact_key(wavelength)).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn sorts_descending_input() {
        let table =
            WavelengthTable::from_xy(&[420.0, 410.0, 400.0], &[15.0, 20.0, 10.0]).unwrap();
        assert_eq!(table.wavelengths(), &[400.0, 410.0, 420.0]);
        assert_eq!(table.intensities(), &[10.0, 20.0, 15.0]);
        assert_eq!(table.first_wavelength(), 400.0);
        assert_eq!(table.last_wavelength(), 420.0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn rejects_empty_spectrum() {
        let err = WavelengthTable::from_pairs(Vec::<(f64, f64)>::new()).unwrap_err();
        assert_eq!(err, InterpError::EmptySpectrum);

        let spectrum = Spectrum {
            x: vec![],
            y: vec![],
            metadata: BTreeMap::new(),
        };
        assert_eq!(
            WavelengthTable::from_spectrum(&spectrum).unwrap_err(),
            InterpError::EmptySpectrum
        );
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = WavelengthTable::from_xy(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(err, InterpError::LengthMismatch { x: 2, y: 1 });
    }

    #[test]
    fn rejects_non_finite_wavelength() {
        let err = WavelengthTable::from_xy(&[1.0, f64::NAN], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            InterpError::NonFiniteWavelength { index: 1, .. }
        ));
        assert!(WavelengthTable::from_xy(&[f64::INFINITY], &[1.0]).is_err());
    }

    #[test]
    fn rejects_duplicate_wavelength() {
        let err = WavelengthTable::from_xy(&[500.0, 400.0, 500.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, InterpError::DuplicateWavelength(500.0));
    }

    #[test]
    fn nan_intensities_are_kept() {
        let table = WavelengthTable::from_xy(&[1.0, 2.0], &[f64::NAN, 3.0]).unwrap();
        assert!(table.intensities()[0].is_nan());
    }

    #[test]
    fn exact_lookup_treats_signed_zero_alike() {
        let table = WavelengthTable::from_xy(&[-1.0, 0.0, 1.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(table.position_of(-0.0), Some(1));
        assert_eq!(table.position_of(1.0), Some(2));
        assert_eq!(table.position_of(0.5), None);
    }
}
