//! Source tag → SoS group routing.

use tracing::warn;

/// Group of the SoS that receives priors from a given source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceGroup {
    /// Generic model priors (`wbm`, `grades`).
    Model,
    /// GRDC gauge priors.
    Grdc,
    /// Geobam reach priors.
    GbReach,
    /// Geobam node priors.
    GbNode,
    /// USGS gauge priors; also the catch-all for unknown tags.
    Usgs,
}

impl SourceGroup {
    /// Looks up the group for a source tag. Never fails.
    pub fn from_source(source: &str) -> Self {
        match source {
            "wbm" | "grades" => Self::Model,
            "grdc" => Self::Grdc,
            "gbreach" => Self::GbReach,
            "gbnode" => Self::GbNode,
            "usgs" => Self::Usgs,
            other => {
                warn!(source = other, "unrecognised source tag, routing to model/usgs");
                Self::Usgs
            }
        }
    }

    /// Group path inside the SoS file.
    pub fn path(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Grdc => "model/grdc",
            Self::GbReach => "gbpriors/reach",
            Self::GbNode => "gbpriors/node",
            Self::Usgs => "model/usgs",
        }
    }
}

/// Returns the SoS group path that priors from `source` are written to.
pub fn route(source: &str) -> &'static str {
    SourceGroup::from_source(source).path()
}

/// Label used for `source` on status lines.
///
/// Geobam reach and node priors share the `GBPRIORS` label; every other tag is
/// upper-cased as is.
pub fn status_label(source: &str) -> String {
    match source {
        "gbreach" | "gbnode" => "GBPRIORS".to_string(),
        other => other.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_routes() {
        assert_eq!(route("wbm"), "model");
        assert_eq!(route("grades"), "model");
        assert_eq!(route("grdc"), "model/grdc");
        assert_eq!(route("gbreach"), "gbpriors/reach");
        assert_eq!(route("gbnode"), "gbpriors/node");
        assert_eq!(route("usgs"), "model/usgs");
    }

    #[test]
    fn unknown_tags_fall_back_to_usgs() {
        assert_eq!(route("unknown_tag"), "model/usgs");
        assert_eq!(route(""), "model/usgs");
        // Matching is case-sensitive.
        assert_eq!(route("WBM"), "model/usgs");
    }

    #[test]
    fn labels() {
        assert_eq!(status_label("gbreach"), "GBPRIORS");
        assert_eq!(status_label("gbnode"), "GBPRIORS");
        assert_eq!(status_label("grdc"), "GRDC");
        assert_eq!(status_label("wbm"), "WBM");
    }
}
