//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - price payload shapes (`PricePoint`, `AreaPrices`, `PriceRecord`)
//! - fetch window resolution (`TimeWindow`, `WindowSelector`)
//! - CLI-facing enums (`LogLevel`)

pub mod types;
pub mod window;

pub use types::*;
pub use window::*;
