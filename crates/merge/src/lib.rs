//! # sos-merge
//!
//! Overwrites priors in the SoS from an exchange file and verifies every
//! write by reading it back.
//!
//! ## Architecture
//!
//! ```text
//! merge_exchange(exchange, config, on_status)
//!   └─ merge_records(records, open, tolerance, on_status)
//!        for each record (one SoS open per record):
//!          ├─ route(source)                     -> group path      (sos-schema)
//!          ├─ align_time_axis(value_t, {prior}t) -> time offsets    (sos-align)
//!          ├─ resolve_ids + resolve_offsets      -> check offsets   (sos-align)
//!          ├─ write payload at precomputed indexes
//!          ├─ read back at check offsets, Tolerance::all_close
//!          └─ MergeStatus -> on_status
//! ```
//!
//! The write offsets (precomputed `indexes` from the exchange file) and the
//! read-back offsets (recomputed from identifiers) are derived separately, so
//! wrong but self-consistent precomputed indexes show up as a verification
//! failure instead of silently landing on the wrong reach.
//!
//! A verification failure is reported and the run continues; structural
//! problems and identifier mismatches stop the run with a [`MergeError`].

mod config;
mod dataset;
mod engine;
mod error;
mod status;
mod verify;

pub use config::MergeConfig;
pub use dataset::SosDataset;
pub use engine::{merge_exchange, merge_record, merge_records, resolve_ids};
pub use error::{AlignAxis, MergeError};
pub use status::{MergeReport, MergeStatus, Outcome};
pub use verify::Tolerance;
