//! Linear resampling of spectra onto a common wavelength axis.
//!
//! The core is [`interp::SequentialInterpolator`], which keeps a cursor into
//! a sorted wavelength table so that ascending query sweeps cost amortized
//! O(1) per point. [`data`] wraps it with file I/O and dataset merging, and
//! [`config`] describes resampling jobs.

pub mod config;
pub mod data;
pub mod interp;
