//! # Ginkgo
//!
//! A dictionary-driven word segmentation library for CJK and mixed
//! Latin/numeric text.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Viterbi shortest-path search over dictionary prefix matches
//! - Plain-text dictionaries with per-token frequency, POS and synonyms,
//!   and user-file precedence
//! - Search-mode expansion: finer sub-segmentations and synonym variants
//!   for feeding a search index
//! - Stop-word filtering via the `__STOP__` POS sentinel
//! - Total over arbitrary bytes; invalid UTF-8 never fails a query
//!
//! ## Usage
//!
//! ```
//! use ginkgo::{output, Segmenter};
//!
//! # fn main() -> ginkgo::Result<()> {
//! let mut segmenter = Segmenter::new();
//! segmenter.load_dictionary("testdata/test_dict1.txt,testdata/test_dict2.txt")?;
//!
//! let segments = segmenter.segment("中国有十三亿人口".as_bytes());
//! assert_eq!(
//!     output::segments_to_string(&segments, false),
//!     "中国/ns 有/p3 十三亿/ 人口/p12 "
//! );
//! # Ok(())
//! # }
//! ```

pub mod atom;
pub mod dictionary;
pub mod error;
pub mod output;
pub mod segmenter;
pub mod token;

mod loader;

// Re-exports
pub use dictionary::Dictionary;
pub use error::{GinkgoError, Result};
pub use segmenter::Segmenter;
pub use token::{Segment, TokenRef, STOP_POS};

/// This library's version number.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
