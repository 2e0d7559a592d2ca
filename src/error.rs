use crate::series::Label;

/// Failure of a statistics or series operation.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    /// Not enough values to divide by the required count.
    #[display("division by zero in {op} (got {count} values)")]
    DivisionByZero { op: &'static str, count: usize },

    /// Label and value counts differ at construction.
    #[display("length mismatch: {n_values} values but {n_labels} labels")]
    LengthMismatch { n_values: usize, n_labels: usize },

    /// Positional access outside the series.
    #[display("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    /// No entry carries the requested label.
    #[display("label '{label}' not found")]
    LabelNotFound { label: Label },
}
