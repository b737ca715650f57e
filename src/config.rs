use crate::error::{FilterError, Result};
use derive_builder::Builder;

/// Construction-time parameters for a [`crate::BloomFilter`].
///
/// Both fields are fixed for the lifetime of the filter built from them;
/// the derived sizing lives in [`crate::FilterParams`].
#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Estimated number of elements the filter will hold
    #[builder(default = "1_000_000")]
    pub estimated_elements: u64,

    /// Target false positive rate (0.0 to 1.0). Stored at `f32` width
    /// because the snapshot format persists it as `f32`; sizing math widens
    /// to `f64`.
    #[builder(default = "0.01")]
    pub false_positive_rate: f32,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.estimated_elements == 0 {
            return Err(FilterError::InvalidParameter(
                "estimated elements must be > 0".into(),
            ));
        }
        let p = f64::from(self.false_positive_rate);
        if !(p > 0.0 && p < 1.0) {
            return Err(FilterError::InvalidParameter(format!(
                "false positive rate must be between 0 and 1, got {p}"
            )));
        }
        Ok(())
    }
}
