//! # sos-align
//!
//! Reconciles two independently ordered identifier arrays so that each record
//! in an exchange file can be written at the right offset of a SoS variable.
//!
//! ## Architecture
//!
//! ```text
//! resolve_offsets(source_ids, store_ids)
//!   ├─ argsort store_ids (stable)
//!   ├─ binary search each source id in the sorted view
//!   └─ map back through the sorter -> offsets into the unsorted store_ids
//!
//! align_time_axis(source_labels, store_labels)
//!   ├─ truncate both label rows to i64
//!   └─ resolve_offsets(...)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use sos_align::resolve_offsets;
//!
//! let offsets = resolve_offsets(&[20, 30], &[30, 10, 20]).unwrap();
//! assert_eq!(offsets, vec![2, 0]);
//! ```

mod error;
mod offsets;
mod time_axis;

pub use error::AlignError;
pub use offsets::{argsort, resolve_offsets};
pub use time_axis::{align_time_axis, time_keys};
