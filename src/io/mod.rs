//! File output for the price table (`export`).

pub mod export;

pub use export::*;
