use std::fmt;

use catalog::DatasetError;
use foundation::math::ProjectionError;

/// Failures of a single map assembly. None of them are retried: the
/// pipeline is deterministic, so the caller keeps its previous payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// Feature has neither an `id` nor the fallback identifier property.
    MissingIdentifier { index: usize, fallback_key: String },
    ProjectionDomain {
        feature_id: Option<String>,
        source: ProjectionError,
    },
    UnsupportedGeometry {
        feature_id: Option<String>,
        kind: &'static str,
    },
    UnknownResolution(String),
    Dataset(DatasetError),
    Config(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::MissingIdentifier { index, fallback_key } => write!(
                f,
                "feature {index} has neither an id nor a `{fallback_key}` property"
            ),
            MapError::ProjectionDomain { feature_id, source } => {
                write!(f, "cannot project feature {}: {source}", display_id(feature_id))
            }
            MapError::UnsupportedGeometry { feature_id, kind } => write!(
                f,
                "cannot serialize {kind} geometry of feature {}",
                display_id(feature_id)
            ),
            MapError::UnknownResolution(tier) => write!(f, "unsupported resolution: {tier}"),
            MapError::Dataset(err) => write!(f, "dataset error: {err}"),
            MapError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::ProjectionDomain { source, .. } => Some(source),
            MapError::Dataset(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DatasetError> for MapError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::UnknownResolution(tier) => MapError::UnknownResolution(tier),
            other => MapError::Dataset(other),
        }
    }
}

fn display_id(id: &Option<String>) -> &str {
    id.as_deref().unwrap_or("<unidentified>")
}
