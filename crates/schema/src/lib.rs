//! # sos-schema
//!
//! Static lookup tables that tie exchange-file groups to SoS structure.
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | [`SourceGroup`] | source tag | group path inside the SoS |
//! | [`IdLocation`] | source tag + id kind | identifier variable inside the SoS |
//! | [`PriorCategory`] | prior name | shape of the exchange-file payload |
//!
//! Every table is total: unknown keys fall through to a documented default
//! (`model/usgs`, `reaches/reach_id`, reach-scalar) and a warning is logged.

mod category;
mod ids;
mod route;

pub use category::{
    DAILY_PRIORS, MONTHLY_PRIORS, NODE_PRIORS, NUM_MONTHS, NUM_PROBABILITIES, PROBABILITY_PRIORS,
    PriorCategory, SecondaryAxis,
};
pub use ids::{IdKind, IdLocation};
pub use route::{SourceGroup, route, status_label};
