//! Statistics used by the correlation engine.
//!
//! - `stats`: whole-sample statistics generic over `num_traits::Float`
//! - `rolling`: trailing-window statistics over series with missing values

pub mod rolling;
pub mod stats;
