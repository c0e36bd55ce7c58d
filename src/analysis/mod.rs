//! Analysis result records and the normalizer that builds them.
//!
//! [`normalize`] is the single consistency boundary between model output and
//! callers: verdicts are derived here and every field receives a default.

mod normalize;
mod types;

pub use normalize::*;
pub use types::*;
