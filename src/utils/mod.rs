//! Shared helpers.

pub mod natsort;

pub use natsort::{natural_cmp, natural_sort};
