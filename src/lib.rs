//! Classic Bloom filter with derived sizing and binary snapshot persistence.
//!
//! A space-efficient pre-filter to put in front of an expensive lookup
//! (disk, network, database): queries answer "definitely absent" or
//! "probably present".
//!
//! HowTo:
//!    * Sizing: from an estimated element count `n` and a target false
//!      positive rate `p`, construction derives `m = ceil(-n * ln p / ln(2)^2)`
//!      bits and `k = round(ln 2 * m / n)` hash rounds (clamped to k >= 1).
//!    * Insertion: the item is hashed into `k` bit indices and each bit is
//!      set in the owned bit array.
//!    * Query: if any of the `k` bits is unset the item was never inserted;
//!      if all are set it is present up to the configured false positive
//!      rate.
//!    * Hashing: the default capability chains a fixed-width digest onto
//!      itself, deriving arbitrarily many rounds from one primitive; any
//!      [`IndexHasher`] implementation can be substituted.
//!    * Persistence: filter state exports to a compact binary snapshot and
//!      imports back, re-deriving sizing instead of trusting stored sizes.
//!
//! Known caveats:
//!    * False positives grow past the target rate once more than `n`
//!      elements are inserted; nothing stops over-filling.
//!    * The insert counter is not deduplicated, so re-inserting an item
//!      biases the live false positive estimate upward.
//!    * No internal synchronization: sharing a filter across threads needs
//!      external locking around every operation.

mod bitarray;
pub mod common;
mod config;
mod error;
mod filter;
mod hash;
mod params;
mod persist;

pub use bitarray::BitArray;
pub use config::{FilterConfig, FilterConfigBuilder, FilterConfigBuilderError};
pub use error::{FilterError, Result};
pub use filter::{BloomFilter, FilterStats};
pub use hash::{ChainedDigestHasher, DoubleHasher, IndexHasher};
pub use params::FilterParams;
