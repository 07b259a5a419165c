use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use formats::{FeatureCollection, GeoPoint};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Precomputed geometry detail level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Low,
    Medium,
}

impl Resolution {
    pub const ALL: [Resolution; 2] = [Resolution::Low, Resolution::Medium];

    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Low => "low",
            Resolution::Medium => "medium",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Resolution::Low),
            "medium" => Ok(Resolution::Medium),
            other => Err(DatasetError::UnknownResolution(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    UnknownResolution(String),
    Parse { tier: Resolution, reason: String },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::UnknownResolution(tier) => write!(f, "unsupported resolution: {tier}"),
            DatasetError::Parse { tier, reason } => {
                write!(f, "failed to decode {tier} dataset: {reason}")
            }
        }
    }
}

impl std::error::Error for DatasetError {}

/// Supplies unprojected feature collections per resolution tier.
///
/// Every call returns a fresh collection with city markers still pending.
pub trait DatasetSource {
    fn load_dataset(&self, tier: Resolution) -> Result<FeatureCollection<GeoPoint>, DatasetError>;
}

static LOW: Lazy<Result<FeatureCollection<GeoPoint>, String>> = Lazy::new(|| {
    FeatureCollection::from_geojson_str(include_str!("../assets/countries-low.geojson"))
        .map_err(|e| e.to_string())
});

static MEDIUM: Lazy<Result<FeatureCollection<GeoPoint>, String>> = Lazy::new(|| {
    FeatureCollection::from_geojson_str(include_str!("../assets/countries-medium.geojson"))
        .map_err(|e| e.to_string())
});

/// Country outlines compiled into the binary. Decoded once per process.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinDatasets;

impl DatasetSource for BuiltinDatasets {
    fn load_dataset(&self, tier: Resolution) -> Result<FeatureCollection<GeoPoint>, DatasetError> {
        let cached = match tier {
            Resolution::Low => &*LOW,
            Resolution::Medium => &*MEDIUM,
        };
        match cached {
            Ok(fc) => {
                debug!(%tier, features = fc.len(), "loaded builtin dataset");
                Ok(fc.clone())
            }
            Err(reason) => Err(DatasetError::Parse {
                tier,
                reason: reason.clone(),
            }),
        }
    }
}

/// Datasets registered at runtime, e.g. a GeoJSON file given on the command line.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDatasets {
    tiers: BTreeMap<Resolution, FeatureCollection<GeoPoint>>,
}

impl InMemoryDatasets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tier(mut self, tier: Resolution, collection: FeatureCollection<GeoPoint>) -> Self {
        self.tiers.insert(tier, collection);
        self
    }

    pub fn insert_geojson(&mut self, tier: Resolution, payload: &str) -> Result<(), DatasetError> {
        let collection =
            FeatureCollection::from_geojson_str(payload).map_err(|e| DatasetError::Parse {
                tier,
                reason: e.to_string(),
            })?;
        self.tiers.insert(tier, collection);
        Ok(())
    }
}

impl DatasetSource for InMemoryDatasets {
    fn load_dataset(&self, tier: Resolution) -> Result<FeatureCollection<GeoPoint>, DatasetError> {
        self.tiers
            .get(&tier)
            .cloned()
            .ok_or_else(|| DatasetError::UnknownResolution(tier.to_string()))
    }
}
