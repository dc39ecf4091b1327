use std::sync::Arc;

use super::diagnostics::{DriftSink, LogSink, OrderViolation};
use super::table::WavelengthTable;

// ---------------------------------------------------------------------------
// SequentialInterpolator – cursor-driven linear interpolation
// ---------------------------------------------------------------------------

/// Piecewise-linear interpolator over a [`WavelengthTable`], tuned for
/// queries that arrive in non-decreasing wavelength order.
///
/// The cursor `pos` is the index of the table entry at or below the most
/// recent query. It only moves forward while queries are sequential, so a
/// full ascending sweep costs O(n + m) for n pixels and m queries. A query
/// below the cursor is still answered correctly: the cursor is reset to 0,
/// the sink is told, and the bracket is found by rescanning.
///
/// Queries take `&mut self`; confine an instance to one query stream and
/// build one interpolator per thread over a shared table for parallel work.
#[derive(Debug, Clone)]
pub struct SequentialInterpolator<S = LogSink> {
    table: Arc<WavelengthTable>,
    pos: usize,
    sink: S,
}

impl SequentialInterpolator<LogSink> {
    /// Interpolator that reports order violations through `log`.
    pub fn new(table: Arc<WavelengthTable>) -> Self {
        Self::with_sink(table, LogSink)
    }
}

impl<S: DriftSink> SequentialInterpolator<S> {
    pub fn with_sink(table: Arc<WavelengthTable>, sink: S) -> Self {
        SequentialInterpolator { table, pos: 0, sink }
    }

    /// Intensity at `wavelength`, clamped to the end values outside the
    /// table range. NaN queries yield NaN and leave the cursor alone.
    pub fn interpolate(&mut self, wavelength: f64) -> f64 {
        let table = &*self.table;
        let wl = table.wavelengths();
        let amp = table.intensities();

        if wavelength.is_nan() {
            return f64::NAN;
        }
        if wavelength <= table.first_wavelength() {
            return amp[0];
        }
        if wavelength >= table.last_wavelength() {
            return amp[amp.len() - 1];
        }
        if let Some(i) = table.position_of(wavelength) {
            return amp[i];
        }

        if wl[self.pos] > wavelength {
            self.sink.order_violation(&OrderViolation {
                cursor: self.pos,
                cursor_wavelength: wl[self.pos],
                query: wavelength,
            });
            self.pos = 0;
        }

        // Past the clamps the table has at least two entries, and stopping
        // at len - 2 keeps pos + 1 in bounds.
        while self.pos + 2 < wl.len() && wl[self.pos + 1] <= wavelength {
            self.pos += 1;
        }

        let (wl0, wl1) = (wl[self.pos], wl[self.pos + 1]);
        let (a0, a1) = (amp[self.pos], amp[self.pos + 1]);
        a0 + (wavelength - wl0) / (wl1 - wl0) * (a1 - a0)
    }

    /// Interpolate every target in order.
    pub fn resample(&mut self, targets: &[f64]) -> Vec<f64> {
        let mut out = Vec::with_capacity(targets.len());
        self.resample_into(targets, &mut out);
        out
    }

    /// Like [`resample`](Self::resample) but reuses `out`'s allocation.
    pub fn resample_into(&mut self, targets: &[f64], out: &mut Vec<f64>) {
        out.clear();
        out.reserve(targets.len());
        for &t in targets {
            out.push(self.interpolate(t));
        }
    }

    /// Move the cursor back to the start of the table.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.pos
    }

    pub fn pixel_count(&self) -> usize {
        self.table.len()
    }

    pub fn table(&self) -> &Arc<WavelengthTable> {
        &self.table
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
