//! Prior name → exchange-file shape table.
//!
//! The lists below must stay identical to the ones used by existing exchange
//! files, otherwise previously produced files would no longer merge.

use tracing::warn;

/// Node-level scalar priors (Geobam node parameters).
pub const NODE_PRIORS: &[&str] = &[
    "river_type",
    "logA0_hat",
    "logn_hat",
    "b_hat",
    "logWb_hat",
    "logDb_hat",
    "logr_hat",
    "logA0_sd",
    "logn_sd",
    "b_sd",
    "logWb_sd",
    "logDb_sd",
    "logr_sd",
    "sigma_man",
    "sigma_amhg",
];

/// Priors stored per month.
pub const MONTHLY_PRIORS: &[&str] = &["monthly_q"];

/// Priors stored per day with a parallel time-label variable.
pub const DAILY_PRIORS: &[&str] = &["grdc_q", "usgs_q"];

/// Priors stored per flow-duration probability bucket.
pub const PROBABILITY_PRIORS: &[&str] = &["flow_duration_q"];

/// Length of the `num_months` dimension.
pub const NUM_MONTHS: usize = 12;

/// Length of the `probability` dimension.
pub const NUM_PROBABILITIES: usize = 20;

/// Second axis of a payload, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondaryAxis {
    /// Fixed 12-month axis.
    Months,
    /// Unlimited day axis.
    Days,
    /// Fixed 20-bucket probability axis.
    Probability,
}

impl SecondaryAxis {
    /// Dimension name in the exchange file.
    pub fn dimension(self) -> &'static str {
        match self {
            Self::Months => "num_months",
            Self::Days => "num_days",
            Self::Probability => "probability",
        }
    }

    /// Fixed length, or `None` for the unlimited day axis.
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            Self::Months => Some(NUM_MONTHS),
            Self::Days => None,
            Self::Probability => Some(NUM_PROBABILITIES),
        }
    }
}

/// Shape category of a prior in the exchange file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorCategory {
    /// `prior_values(num_nodes)`
    NodeScalar,
    /// `prior_values(num_reaches, probability)`
    ReachProbability,
    /// `prior_values(num_reaches, num_months)`
    ReachMonthly,
    /// `prior_values(num_reaches, num_days)` plus `value_t`.
    ReachDaily,
    /// `prior_values(num_reaches)`; default for unlisted names.
    ReachScalar,
}

impl PriorCategory {
    /// Table lookup by prior name alone. `None` for names in no list.
    pub fn lookup(prior: &str) -> Option<Self> {
        if NODE_PRIORS.contains(&prior) {
            Some(Self::NodeScalar)
        } else if PROBABILITY_PRIORS.contains(&prior) {
            Some(Self::ReachProbability)
        } else if MONTHLY_PRIORS.contains(&prior) {
            Some(Self::ReachMonthly)
        } else if DAILY_PRIORS.contains(&prior) {
            Some(Self::ReachDaily)
        } else {
            None
        }
    }

    /// Category used when packing `prior` from `source`.
    ///
    /// Node priors are only node-shaped when they come from `gbnode`; any
    /// other source writes them per reach. Unlisted names are reach scalars.
    pub fn classify(source: &str, prior: &str) -> Self {
        match Self::lookup(prior) {
            Some(Self::NodeScalar) if source != "gbnode" => Self::ReachScalar,
            Some(category) => category,
            None => {
                warn!(source, prior, "prior not in category table, packing as reach scalar");
                Self::ReachScalar
            }
        }
    }

    /// Identifier kind the payload is keyed on.
    pub fn id_kind(self) -> crate::IdKind {
        match self {
            Self::NodeScalar => crate::IdKind::Node,
            _ => crate::IdKind::Reach,
        }
    }

    /// Second payload axis, if the category has one.
    pub fn secondary_axis(self) -> Option<SecondaryAxis> {
        match self {
            Self::ReachProbability => Some(SecondaryAxis::Probability),
            Self::ReachMonthly => Some(SecondaryAxis::Months),
            Self::ReachDaily => Some(SecondaryAxis::Days),
            Self::NodeScalar | Self::ReachScalar => None,
        }
    }

    /// Whether the exchange group carries a `value_t` time-label variable.
    pub fn has_time_labels(self) -> bool {
        matches!(self, Self::ReachDaily)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_each_list() {
        assert_eq!(PriorCategory::lookup("logA0_hat"), Some(PriorCategory::NodeScalar));
        assert_eq!(
            PriorCategory::lookup("flow_duration_q"),
            Some(PriorCategory::ReachProbability)
        );
        assert_eq!(PriorCategory::lookup("monthly_q"), Some(PriorCategory::ReachMonthly));
        assert_eq!(PriorCategory::lookup("usgs_q"), Some(PriorCategory::ReachDaily));
        assert_eq!(PriorCategory::lookup("mean_q"), None);
    }

    #[test]
    fn node_priors_need_gbnode() {
        assert_eq!(
            PriorCategory::classify("gbnode", "sigma_man"),
            PriorCategory::NodeScalar
        );
        assert_eq!(
            PriorCategory::classify("gbreach", "sigma_man"),
            PriorCategory::ReachScalar
        );
    }

    #[test]
    fn unlisted_is_reach_scalar() {
        assert_eq!(PriorCategory::classify("wbm", "mean_q"), PriorCategory::ReachScalar);
    }

    #[test]
    fn axes() {
        assert_eq!(PriorCategory::ReachDaily.secondary_axis(), Some(SecondaryAxis::Days));
        assert_eq!(PriorCategory::ReachScalar.secondary_axis(), None);
        assert_eq!(SecondaryAxis::Probability.fixed_len(), Some(20));
        assert_eq!(SecondaryAxis::Days.fixed_len(), None);
        assert!(PriorCategory::ReachDaily.has_time_labels());
        assert!(!PriorCategory::ReachMonthly.has_time_labels());
    }
}
