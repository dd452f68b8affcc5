//! Where identifier arrays live in the SoS.

/// Spatial unit an exchange-file group is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// Keyed on `reach_id` / `num_reaches`.
    Reach,
    /// Keyed on `node_id` / `num_nodes`.
    Node,
}

impl IdKind {
    /// Name of the identifier variable in an exchange-file group.
    pub fn variable(self) -> &'static str {
        match self {
            Self::Reach => "reach_id",
            Self::Node => "node_id",
        }
    }

    /// Name of the leading dimension in an exchange-file group.
    pub fn dimension(self) -> &'static str {
        match self {
            Self::Reach => "num_reaches",
            Self::Node => "num_nodes",
        }
    }
}

/// SoS variable holding the destination identifiers for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdLocation {
    /// `nodes/node_id`
    Nodes,
    /// `model/usgs/usgs_reach_id`
    UsgsReaches,
    /// `model/grdc/grdc_reach_id`
    GrdcReaches,
    /// `reaches/reach_id`
    Reaches,
}

impl IdLocation {
    /// Picks the identifier table for a source tag and identifier kind.
    ///
    /// Gauge sources keep their own reach lists; everything else is matched
    /// against the global reach table.
    pub fn resolve(source: &str, kind: IdKind) -> Self {
        match (kind, source) {
            (IdKind::Node, _) => Self::Nodes,
            (IdKind::Reach, "usgs") => Self::UsgsReaches,
            (IdKind::Reach, "grdc") => Self::GrdcReaches,
            (IdKind::Reach, _) => Self::Reaches,
        }
    }

    /// Full variable path inside the SoS file.
    pub fn path(self) -> &'static str {
        match self {
            Self::Nodes => "nodes/node_id",
            Self::UsgsReaches => "model/usgs/usgs_reach_id",
            Self::GrdcReaches => "model/grdc/grdc_reach_id",
            Self::Reaches => "reaches/reach_id",
        }
    }
}
