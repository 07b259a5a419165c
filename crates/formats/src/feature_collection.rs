//! GeoJSON-style feature collections.
//!
//! Geometry and collections are generic over the coordinate type so the
//! pipeline stage is visible in the type: raw datasets are
//! `FeatureCollection<GeoPoint>`, projected ones `FeatureCollection<Vec2>`.

use serde_json::{Map, Value};

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry<C> {
    Point(C),
    MultiPoint(Vec<C>),
    LineString(Vec<C>),
    MultiLineString(Vec<Vec<C>>),
    /// Linear rings; the first is the outer boundary.
    Polygon(Vec<Vec<C>>),
    MultiPolygon(Vec<Vec<Vec<C>>>),
}

impl<C> Geometry<C> {
    /// GeoJSON type name.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Rebuilds the geometry with every coordinate passed through `f`,
    /// keeping ring and polygon nesting intact. Stops at the first error.
    pub fn try_map_coords<D, E>(
        self,
        f: &mut impl FnMut(C) -> Result<D, E>,
    ) -> Result<Geometry<D>, E> {
        Ok(match self {
            Geometry::Point(c) => Geometry::Point(f(c)?),
            Geometry::MultiPoint(cs) => Geometry::MultiPoint(map_seq(cs, f)?),
            Geometry::LineString(cs) => Geometry::LineString(map_seq(cs, f)?),
            Geometry::MultiLineString(lines) => Geometry::MultiLineString(map_rings(lines, f)?),
            Geometry::Polygon(rings) => Geometry::Polygon(map_rings(rings, f)?),
            Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(
                polys
                    .into_iter()
                    .map(|rings| map_rings(rings, f))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    pub fn for_each_coord(&self, mut f: impl FnMut(&C)) {
        match self {
            Geometry::Point(c) => f(c),
            Geometry::MultiPoint(cs) | Geometry::LineString(cs) => cs.iter().for_each(f),
            Geometry::MultiLineString(rings) | Geometry::Polygon(rings) => {
                rings.iter().flatten().for_each(f)
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().for_each(f),
        }
    }
}

fn map_seq<C, D, E>(cs: Vec<C>, f: &mut impl FnMut(C) -> Result<D, E>) -> Result<Vec<D>, E> {
    cs.into_iter().map(|c| f(c)).collect()
}

fn map_rings<C, D, E>(
    rings: Vec<Vec<C>>,
    f: &mut impl FnMut(C) -> Result<D, E>,
) -> Result<Vec<Vec<D>>, E> {
    rings.into_iter().map(|ring| map_seq(ring, f)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature<C> {
    pub id: Option<String>,
    pub name: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: Geometry<C>,
}

impl<C> Feature<C> {
    pub fn new(id: Option<String>, geometry: Geometry<C>) -> Self {
        Self {
            id,
            name: None,
            properties: Map::new(),
            geometry,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// String form of a property, numbers included.
    pub fn property_str(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Whether synthetic city markers were already appended to a collection.
///
/// The only transition is `Pending -> Appended`, made by
/// [`FeatureCollection::append_city_markers_with`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CityMarkers {
    #[default]
    Pending,
    Appended,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection<C> {
    pub features: Vec<Feature<C>>,
    cities: CityMarkers,
}

impl<C> FeatureCollection<C> {
    pub fn new(features: Vec<Feature<C>>) -> Self {
        Self {
            features,
            cities: CityMarkers::Pending,
        }
    }

    pub fn cities_added(&self) -> bool {
        self.cities == CityMarkers::Appended
    }

    /// Appends the features built by `make` unless markers were already
    /// appended; `make` is not called in that case.
    pub fn append_city_markers_with(mut self, make: impl FnOnce() -> Vec<Feature<C>>) -> Self {
        if self.cities == CityMarkers::Appended {
            return self;
        }
        self.features.extend(make());
        self.cities = CityMarkers::Appended;
        self
    }

    pub fn map_features<D>(self, f: impl FnMut(Feature<C>) -> Feature<D>) -> FeatureCollection<D> {
        FeatureCollection {
            features: self.features.into_iter().map(f).collect(),
            cities: self.cities,
        }
    }

    /// Rebuilds every feature with `f`, carrying the marker state over.
    pub fn try_map_features<D, E>(
        self,
        f: impl FnMut((usize, Feature<C>)) -> Result<Feature<D>, E>,
    ) -> Result<FeatureCollection<D>, E> {
        let features = self
            .features
            .into_iter()
            .enumerate()
            .map(f)
            .collect::<Result<Vec<_>, E>>()?;
        Ok(FeatureCollection {
            features,
            cities: self.cities,
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Debug)]
pub enum FeatureCollectionError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for FeatureCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureCollectionError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            FeatureCollectionError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for FeatureCollectionError {}

impl FeatureCollection<GeoPoint> {
    pub fn from_geojson_str(payload: &str) -> Result<Self, FeatureCollectionError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| FeatureCollectionError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, FeatureCollectionError> {
        let obj = value
            .as_object()
            .ok_or(FeatureCollectionError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(FeatureCollectionError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(FeatureCollectionError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(FeatureCollectionError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let invalid = |reason: String| FeatureCollectionError::InvalidFeature { index, reason };

            let feat_obj = feat_val
                .as_object()
                .ok_or_else(|| invalid("feature must be an object".to_string()))?;

            let feat_type = feat_obj
                .get("type")
                .and_then(|v| v.as_str())
                .ok_or_else(|| invalid("feature missing type".to_string()))?;
            if feat_type != "Feature" {
                return Err(invalid(format!("unexpected feature type: {feat_type}")));
            }

            let id = match feat_obj.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };
            let name = feat_obj
                .get("name")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();

            let geometry_val = feat_obj
                .get("geometry")
                .ok_or_else(|| invalid("feature missing geometry".to_string()))?;
            let geometry = parse_geometry(geometry_val).map_err(invalid)?;

            features.push(Feature {
                id,
                name,
                properties,
                geometry,
            });
        }

        Ok(Self::new(features))
    }
}

fn parse_geometry(value: &Value) -> Result<Geometry<GeoPoint>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_rings(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let rings = coords
        .as_array()
        .ok_or("coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_rings).collect()
}

#[cfg(test)]
mod tests {
    use super::{Feature, FeatureCollection, FeatureCollectionError, GeoPoint, Geometry};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "de",
                "properties": { "wb_a2": "DE", "pop": 83 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[10, 50], [11, 50], [11, 51], [10, 51], [10, 50]]]
                }
            },
            {
                "type": "Feature",
                "name": "Rhine",
                "properties": {},
                "geometry": { "type": "LineString", "coordinates": [[7.5, 47.5], [8.2, 49.9]] }
            }
        ]
    }"#;

    #[test]
    fn parses_ids_names_and_geometry() {
        let fc = FeatureCollection::from_geojson_str(SAMPLE).expect("parse");
        assert_eq!(fc.len(), 2);
        assert!(!fc.cities_added());

        let de = &fc.features[0];
        assert_eq!(de.id.as_deref(), Some("de"));
        assert_eq!(de.property_str("wb_a2").as_deref(), Some("DE"));
        assert_eq!(de.property_str("pop").as_deref(), Some("83"));
        match &de.geometry {
            Geometry::Polygon(rings) => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0][1], GeoPoint::new(11.0, 50.0));
            }
            other => panic!("unexpected geometry: {other:?}"),
        }

        let rhine = &fc.features[1];
        assert_eq!(rhine.id, None);
        assert_eq!(rhine.name.as_deref(), Some("Rhine"));
        assert_eq!(rhine.geometry.kind(), "LineString");
    }

    #[test]
    fn rejects_non_collections_and_unknown_geometry() {
        let err = FeatureCollection::from_geojson_str(r#"{"type":"Feature"}"#)
            .expect_err("not a collection");
        assert!(matches!(err, FeatureCollectionError::NotAFeatureCollection));

        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1,2]}},
            {"type":"Feature","properties":{},"geometry":{"type":"GeometryCollection","coordinates":[]}}
        ]}"#;
        match FeatureCollection::from_geojson_str(payload) {
            Err(FeatureCollectionError::InvalidFeature { index, reason }) => {
                assert_eq!(index, 1);
                assert!(reason.contains("GeometryCollection"), "{reason}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn try_map_coords_keeps_nesting() {
        let geom = Geometry::MultiPolygon(vec![
            vec![vec![1.0, 2.0, 3.0], vec![4.0]],
            vec![vec![5.0, 6.0]],
        ]);
        let mapped = geom
            .try_map_coords(&mut |c: f64| Ok::<_, ()>(c * 10.0))
            .expect("map");
        assert_eq!(
            mapped,
            Geometry::MultiPolygon(vec![
                vec![vec![10.0, 20.0, 30.0], vec![40.0]],
                vec![vec![50.0, 60.0]],
            ])
        );

        let mut seen = Vec::new();
        mapped.for_each_coord(|c| seen.push(*c));
        assert_eq!(seen, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    }

    #[test]
    fn try_map_coords_stops_at_first_error() {
        let geom = Geometry::LineString(vec![1.0, -1.0, 2.0]);
        let mut calls = 0;
        let result = geom.try_map_coords(&mut |c: f64| {
            calls += 1;
            if c < 0.0 { Err(c) } else { Ok(c) }
        });
        assert_eq!(result, Err(-1.0));
        assert_eq!(calls, 2);
    }

    #[test]
    fn city_markers_append_once() {
        let fc = FeatureCollection::new(vec![Feature::new(Some("a".into()), Geometry::Point(0.0))]);
        let make = || vec![Feature::new(Some("Place-X".into()), Geometry::Point(1.0))];

        let once = fc.append_city_markers_with(make);
        assert!(once.cities_added());
        assert_eq!(once.len(), 2);

        let twice = once.append_city_markers_with(|| panic!("markers built twice"));
        assert_eq!(twice.len(), 2);
    }
}
