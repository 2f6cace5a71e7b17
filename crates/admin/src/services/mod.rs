//! Pure aggregation logic backing the admin dashboard.

pub mod stats;
