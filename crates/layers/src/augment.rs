//! Feature enrichment ahead of projection.
//!
//! Stages run in a fixed order, each consuming the previous stage's output:
//! identifiers, display names, city markers, selection highlight.

use catalog::{CityCatalog, CityEntry, CountryLookup};
use formats::{Feature, FeatureCollection, GeoPoint, Geometry};
use serde_json::Value;
use tracing::debug;

use crate::config::MapConfig;
use crate::error::MapError;

pub const PROP_FILL: &str = "fill";
pub const PROP_STROKE: &str = "stroke";
pub const PROP_STROKE_WIDTH: &str = "stroke-width";

/// Prefix of identifiers given to synthetic city features.
pub const CITY_ID_PREFIX: &str = "Place-";

/// Runs every augmentation stage on a geographic collection.
pub fn augment<R>(
    collection: FeatureCollection<GeoPoint>,
    selected: Option<&str>,
    reference: &R,
    config: &MapConfig,
) -> Result<FeatureCollection<GeoPoint>, MapError>
where
    R: CountryLookup + CityCatalog,
{
    let collection = resolve_identifiers(collection, &config.fallback_id_key)?;
    let collection = attach_names(collection, reference);
    let collection = append_city_markers(collection, reference, config);
    Ok(apply_selection_style(collection, selected, config))
}

/// Gives every feature an id.
///
/// The `fallback_key` property, when it holds a string or number, wins over
/// an explicit `id`; numbers become their decimal string. A fallback
/// property that is null or any other JSON type counts as absent, so the
/// explicit `id` is used instead of failing. Features with neither fail the
/// whole collection.
pub fn resolve_identifiers<C>(
    collection: FeatureCollection<C>,
    fallback_key: &str,
) -> Result<FeatureCollection<C>, MapError> {
    let resolved = collection.try_map_features(|(index, mut feature)| -> Result<_, MapError> {
        let id = feature
            .property_str(fallback_key)
            .or_else(|| feature.id.take())
            .ok_or_else(|| MapError::MissingIdentifier {
                index,
                fallback_key: fallback_key.to_string(),
            })?;
        feature.id = Some(id);
        Ok(feature)
    })?;
    debug!(features = resolved.len(), "resolved feature identifiers");
    Ok(resolved)
}

/// Sets `name` on features whose id is a known country code.
pub fn attach_names<C>(
    collection: FeatureCollection<C>,
    lookup: &impl CountryLookup,
) -> FeatureCollection<C> {
    let mut named = 0usize;
    let collection = collection.map_features(|mut feature| {
        if let Some(name) = feature
            .id
            .as_deref()
            .and_then(|id| lookup.lookup_country_name(id))
        {
            feature.name = Some(name);
            named += 1;
        }
        feature
    });
    debug!(named, features = collection.len(), "attached country names");
    collection
}

/// Appends one styled point per reference city. Has no effect when the
/// collection already carries the markers.
pub fn append_city_markers(
    collection: FeatureCollection<GeoPoint>,
    cities: &impl CityCatalog,
    config: &MapConfig,
) -> FeatureCollection<GeoPoint> {
    if collection.cities_added() {
        debug!("city markers already present");
        return collection;
    }
    collection.append_city_markers_with(|| {
        let markers: Vec<_> = cities
            .list_cities()
            .iter()
            .map(|city| city_feature(city, config))
            .collect();
        debug!(count = markers.len(), "appended city markers");
        markers
    })
}

fn city_feature(city: &CityEntry, config: &MapConfig) -> Feature<GeoPoint> {
    let mut feature = Feature::new(
        Some(format!("{CITY_ID_PREFIX}{}", city.name)),
        Geometry::Point(city.coordinate),
    )
    .with_property("name", city.name)
    .with_property(PROP_FILL, config.city_fill.as_str())
    .with_property(PROP_STROKE, config.city_stroke.as_str())
    .with_property(PROP_STROKE_WIDTH, config.city_stroke_width);
    feature.name = Some(city.name.to_string());
    feature
}

/// Overwrites the style of the feature whose id equals `selected`.
///
/// Only the first match is styled; ids are expected to be unique.
pub fn apply_selection_style<C>(
    mut collection: FeatureCollection<C>,
    selected: Option<&str>,
    config: &MapConfig,
) -> FeatureCollection<C> {
    let Some(selected) = selected else {
        return collection;
    };
    let Some(index) = collection
        .features
        .iter()
        .position(|f| f.id.as_deref() == Some(selected))
    else {
        debug!(selected, "selected region not present in dataset");
        return collection;
    };

    let props = &mut collection.features[index].properties;
    props.insert(
        PROP_FILL.to_string(),
        Value::from(config.selected_fill.as_str()),
    );
    props.insert(
        PROP_STROKE.to_string(),
        Value::from(config.selected_stroke.as_str()),
    );
    props.insert(
        PROP_STROKE_WIDTH.to_string(),
        Value::from(config.selected_stroke_width),
    );
    debug!(selected, "applied selection style");
    collection
}
