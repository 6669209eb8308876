//! Deterministic pricing strategy engine.
//!
//! The engine is a single forward pass with no shared state:
//! competitor prices → metrics → zone → recommendations → report.
//! Every stage allocates a fresh value; nothing here performs I/O.
//! Natural-language polish happens outside the engine and may be
//! skipped entirely without changing any decision the engine made.

pub mod festival;
pub mod metrics;
pub mod recommend;
pub mod report;
pub mod rounding;
pub mod thresholds;
pub mod zone;
