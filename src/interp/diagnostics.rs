use std::fmt;

// ---------------------------------------------------------------------------
// OrderViolation – a query arrived below the cursor
// ---------------------------------------------------------------------------

/// Reported when a query wavelength is below the cursor's table entry.
/// The interpolator has already recovered by rescanning from index 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderViolation {
    /// Cursor position before the reset.
    pub cursor: usize,
    /// Table wavelength at that position.
    pub cursor_wavelength: f64,
    /// The offending query.
    pub query: f64,
}

impl fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "non-sequential query: cursor at index {} ({}) is past requested wavelength {}; rescanning from start",
            self.cursor, self.cursor_wavelength, self.query
        )
    }
}

// ---------------------------------------------------------------------------
// DriftSink – where order violations go
// ---------------------------------------------------------------------------

/// Receiver for order-violation diagnostics. Advisory only: a sink cannot
/// change the value returned by the query that triggered it.
pub trait DriftSink {
    fn order_violation(&mut self, event: &OrderViolation);
}

/// Default sink: forwards events to the `log` facade at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DriftSink for LogSink {
    fn order_violation(&mut self, event: &OrderViolation) {
        log::warn!("{event}");
    }
}

/// Records every event, e.g. to count drifts after a resampling pass.
impl DriftSink for Vec<OrderViolation> {
    fn order_violation(&mut self, event: &OrderViolation) {
        self.push(*event);
    }
}

/// Adapts a closure into a sink, e.g. to count or forward events.
#[derive(Debug, Clone, Copy, Default)]
pub struct FnSink<F>(pub F);

impl<F> DriftSink for FnSink<F>
where
    F: FnMut(&OrderViolation),
{
    fn order_violation(&mut self, event: &OrderViolation) {
        (self.0)(event);
    }
}

impl<S: DriftSink + ?Sized> DriftSink for &mut S {
    fn order_violation(&mut self, event: &OrderViolation) {
        (**self).order_violation(event);
    }
}
