//! Error sink for the compiled module and the bootstrap code.

/// Fire-and-forget problem sink.
///
/// Accepts any message and never fails. Used for module-reported errors,
/// failing watch callbacks and initialization failures alike.
pub trait ErrorReporter {
    fn report(&self, message: &str);
}

/// Any `Fn(&str)` closure is a reporter.
impl<F> ErrorReporter for F
where
    F: Fn(&str),
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Prints each report as its own `[error]` line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, message: &str) {
        crate::log!("error"; "{}", message);
    }
}

/// Drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ErrorReporter for NullReporter {
    fn report(&self, _message: &str) {}
}
