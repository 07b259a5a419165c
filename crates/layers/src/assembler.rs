use catalog::{
    BuiltinCatalog, BuiltinDatasets, CityCatalog, CountryLookup, DatasetSource, Resolution,
};
use tracing::{debug, info_span};

use crate::augment::augment;
use crate::config::MapConfig;
use crate::error::MapError;
use crate::payload::RenderablePayload;
use crate::project::project;
use crate::svg::serialize;

/// Builds renderable payloads from a dataset source and reference tables.
///
/// Output depends only on the tier, the selection and the immutable inputs
/// held here, so equal requests yield equal payloads. Nothing is cached.
#[derive(Debug, Clone)]
pub struct MapAssembler<D = BuiltinDatasets, R = BuiltinCatalog> {
    datasets: D,
    reference: R,
    config: MapConfig,
}

impl MapAssembler {
    /// Compiled-in datasets and tables with the default palette.
    pub fn builtin() -> Self {
        Self::new(BuiltinDatasets, BuiltinCatalog, MapConfig::default())
    }
}

impl Default for MapAssembler {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<D, R> MapAssembler<D, R>
where
    D: DatasetSource,
    R: CountryLookup + CityCatalog,
{
    pub fn new(datasets: D, reference: R, config: MapConfig) -> Self {
        Self {
            datasets,
            reference,
            config,
        }
    }

    /// Loads the tier's dataset, then augments, projects and serializes it.
    /// The first failing stage aborts the build; no partial output is returned.
    pub fn build_payload(
        &self,
        tier: Resolution,
        selected: Option<&str>,
    ) -> Result<RenderablePayload, MapError> {
        let _span = info_span!("build_payload", %tier, selected).entered();

        let raw = self.datasets.load_dataset(tier)?;
        debug!(features = raw.len(), "loaded dataset");

        let augmented = augment(raw, selected, &self.reference, &self.config)?;
        let projected = project(augmented)?;
        serialize(&projected, &self.config)
    }

    /// Like [`MapAssembler::build_payload`] for a tier given by name.
    /// Unknown names fail before any stage runs.
    pub fn build_payload_for(
        &self,
        tier: &str,
        selected: Option<&str>,
    ) -> Result<RenderablePayload, MapError> {
        let tier: Resolution = tier.parse()?;
        self.build_payload(tier, selected)
    }
}

#[cfg(test)]
mod tests {
    use super::MapAssembler;
    use crate::config::MapConfig;
    use crate::error::MapError;
    use catalog::{
        BuiltinCatalog, CityCatalog, CityEntry, CountryLookup, DatasetError, DatasetSource,
        InMemoryDatasets, Resolution,
    };
    use formats::{FeatureCollection, GeoPoint};
    use foundation::math::mercator_forward;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    const TWO_COUNTRIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "de",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[10, 50], [11, 50], [11, 51], [10, 51], [10, 50]]]
                }
            },
            {
                "type": "Feature",
                "id": "ch",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[8, 46], [9, 46], [9, 47], [8, 47], [8, 46]]]
                }
            }
        ]
    }"#;

    fn two_country_datasets() -> InMemoryDatasets {
        let mut datasets = InMemoryDatasets::new();
        datasets
            .insert_geojson(Resolution::Low, TWO_COUNTRIES)
            .expect("fixture parses");
        datasets
    }

    fn assembler() -> MapAssembler<InMemoryDatasets, BuiltinCatalog> {
        MapAssembler::new(two_country_datasets(), BuiltinCatalog, MapConfig::default())
    }

    fn path_element<'a>(markup: &'a str, id: &str) -> &'a str {
        let start = markup
            .find(&format!(r#"<path id="{id}""#))
            .expect("path present");
        let end = markup[start..].find("/>").expect("path closed") + start;
        &markup[start..end]
    }

    #[test]
    fn two_countries_without_selection() {
        let payload = assembler()
            .build_payload(Resolution::Low, None)
            .expect("payload");
        let paths = payload.path_markup();
        assert_eq!(paths.matches("<path").count(), 2);
        assert!(!paths.contains("fill="));
        assert!(!paths.contains("stroke"));
        assert!(path_element(paths, "de").contains(r#"data-name="Deutschland""#));

        let vp = payload.viewport();
        assert!(vp.width >= 0.0 && vp.height >= 0.0);
        for (lon, lat) in [(10.0, 50.0), (11.0, 51.0), (8.0, 46.0), (9.0, 47.0)] {
            let p = mercator_forward(lon, lat).expect("project");
            assert!(vp.contains(p), "({lon}, {lat}) outside {vp:?}");
        }
    }

    #[test]
    fn selected_country_is_highlighted() {
        let payload = assembler()
            .build_payload(Resolution::Low, Some("de"))
            .expect("payload");
        let paths = payload.path_markup();

        let de = path_element(paths, "de");
        assert!(de.contains(r##"fill="#c0e0c0""##), "{de}");
        assert!(de.contains(r##"stroke="#a0a0a0""##), "{de}");
        assert!(de.contains(r#"stroke-width="0.1""#), "{de}");

        let ch = path_element(paths, "ch");
        assert!(!ch.contains("fill="), "{ch}");
        assert!(!ch.contains("stroke"), "{ch}");

        let unselected = assembler().build_payload(Resolution::Low, None).expect("payload");
        assert_eq!(ch, path_element(unselected.path_markup(), "ch"));
    }

    #[test]
    fn city_markers_follow_paths() {
        let payload = assembler()
            .build_payload(Resolution::Low, None)
            .expect("payload");
        assert_eq!(
            payload.marker_markup().matches("<circle").count(),
            catalog::CITIES.len()
        );
        assert!(payload.marker_markup().contains(r#"id="Place-Berlin""#));
    }

    #[test]
    fn identical_requests_give_identical_payloads() {
        let a = assembler();
        let first = a.build_payload(Resolution::Low, Some("ch")).expect("payload");
        let second = a.build_payload(Resolution::Low, Some("ch")).expect("payload");
        assert_eq!(first, second);
        assert_eq!(first.content_hash(), second.content_hash());

        let other = a.build_payload(Resolution::Low, Some("de")).expect("payload");
        assert_ne!(first.content_hash(), other.content_hash());
    }

    #[test]
    fn unknown_tiers_fail() {
        assert_eq!(
            assembler().build_payload_for("ultra", None),
            Err(MapError::UnknownResolution("ultra".to_string()))
        );
        assert_eq!(
            assembler().build_payload(Resolution::Medium, None),
            Err(MapError::UnknownResolution("medium".to_string()))
        );
    }

    #[derive(Default)]
    struct CountingSource {
        calls: Cell<usize>,
    }

    impl DatasetSource for CountingSource {
        fn load_dataset(
            &self,
            _tier: Resolution,
        ) -> Result<FeatureCollection<GeoPoint>, DatasetError> {
            self.calls.set(self.calls.get() + 1);
            Ok(FeatureCollection::new(vec![]))
        }
    }

    #[test]
    fn unknown_tier_name_stops_before_loading() {
        let a = MapAssembler::new(CountingSource::default(), BuiltinCatalog, MapConfig::default());
        assert!(a.build_payload_for("high", None).is_err());
        assert_eq!(a.datasets.calls.get(), 0);
        assert!(a.build_payload_for("low", None).is_ok());
        assert_eq!(a.datasets.calls.get(), 1);
    }

    struct NoCities;

    impl CountryLookup for NoCities {
        fn lookup_country_name(&self, _code: &str) -> Option<String> {
            None
        }
    }

    impl CityCatalog for NoCities {
        fn list_cities(&self) -> Vec<CityEntry> {
            Vec::new()
        }
    }

    #[test]
    fn missing_identifier_aborts_assembly() {
        let mut datasets = InMemoryDatasets::new();
        datasets
            .insert_geojson(
                Resolution::Low,
                r#"{"type":"FeatureCollection","features":[
                    {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0,0]}}
                ]}"#,
            )
            .expect("fixture parses");
        let a = MapAssembler::new(datasets, NoCities, MapConfig::default());
        assert!(matches!(
            a.build_payload(Resolution::Low, None),
            Err(MapError::MissingIdentifier { index: 0, .. })
        ));
    }

    #[test]
    fn polar_coordinates_abort_assembly() {
        let mut datasets = InMemoryDatasets::new();
        datasets
            .insert_geojson(
                Resolution::Low,
                r#"{"type":"FeatureCollection","features":[
                    {"type":"Feature","id":"np","properties":{},"geometry":{"type":"Point","coordinates":[0,90]}}
                ]}"#,
            )
            .expect("fixture parses");
        let a = MapAssembler::new(datasets, NoCities, MapConfig::default());
        assert!(matches!(
            a.build_payload(Resolution::Low, None),
            Err(MapError::ProjectionDomain { .. })
        ));
    }

    #[test]
    fn builtin_tiers_assemble() {
        let a = MapAssembler::builtin();
        for tier in Resolution::ALL {
            let payload = a.build_payload(tier, Some("de")).expect("builtin payload");
            assert!(payload.path_markup().contains(r#"id="de""#), "{tier}");
            assert!(payload.viewport().width > 0.0);
        }
    }
}
