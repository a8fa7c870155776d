//! Aggregation, ranking and normalization over loaded rows.
//!
//! The generic building blocks ([`aggregate`], [`rank`], [`utility`],
//! [`color`]) are pure functions. [`analyzer`] and [`covid`] chain them into
//! one pipeline per dashboard visualization, and [`writetos3`] publishes the
//! resulting documents.

pub mod aggregate;
pub mod analyzer;
pub mod color;
pub mod covid;
pub mod rank;
pub mod types;
pub mod utility;
pub mod writetos3;
