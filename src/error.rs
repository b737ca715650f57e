use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Bit buffer allocation of {bytes} bytes cannot be satisfied")]
    AllocationFailure { bytes: u64 },

    #[error("Index out of bounds: {index} >= {number_bits}")]
    IndexOutOfBounds { index: u64, number_bits: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt snapshot: expected {expected} bytes, got {actual}")]
    CorruptData { expected: u64, actual: u64 },
}
