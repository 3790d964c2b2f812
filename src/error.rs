use thiserror::Error;

/// The error type returned by this crate.
///
/// Configuration and instance-load errors are surfaced immediately and never
/// retried; inner search loops never swallow an error. `BudgetExhausted` is
/// deliberately absent here — running out of evaluation budget is ordinary
/// loop termination, not a failure.
#[derive(Error, Debug)]
pub enum BenchError {
    /// The instance file failed to parse: a missing header, a non-numeric
    /// token, a wrong token count, or an out-of-range `links` index. The
    /// first field names the file; the second names the offending token or
    /// header and the reason it was rejected.
    #[error("malformed instance file '{0}': {1}")]
    MalformedInstance(String, String),

    /// A driver configuration value was out of range: a negative count, a
    /// probability outside `[0, 1]`, a reference-point dimension mismatch,
    /// an empty mating pool, or a zero tournament size.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The instance file could not be opened or read.
    #[error("I/O error reading '{0}': {1}")]
    Io(String, String),
}
