//! Fluent builder APIs for complete datasets.
//!
//! The [`DatasetBuilder`] runs every generator in dependency order from one
//! seeded random stream and optionally writes the result to a [`Store`].
//!
//! [`Store`]: crate::db::Store

mod dataset;

pub use dataset::{BuildError, Dataset, DatasetBuilder, DatasetMetrics};
