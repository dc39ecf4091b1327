/// Interpolation engine: sorted wavelength tables and a cursor-driven
/// linear interpolator for monotone query streams.
///
/// ```text
///   Spectrum (x, y) / (wl, intensity) pairs
///        │
///        ▼
///   ┌────────────────┐
///   │ WavelengthTable │  sorted, deduplicated, first/last cached
///   └────────────────┘
///        │  Arc (shared read-only)
///        ▼
///   ┌──────────────────────┐
///   │ SequentialInterpolator│  private cursor, one per query stream
///   └──────────────────────┘
///        │ order violations
///        ▼
///   DriftSink (LogSink by default)
/// ```

pub mod diagnostics;
pub mod sequential;
pub mod table;

pub use diagnostics::{DriftSink, FnSink, LogSink, OrderViolation};
pub use sequential::SequentialInterpolator;
pub use table::{InterpError, WavelengthTable};
