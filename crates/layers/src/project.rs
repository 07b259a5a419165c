use formats::{FeatureCollection, GeoPoint};
use foundation::Aabb2;
use foundation::math::{Vec2, mercator_forward};
use tracing::debug;

use crate::error::MapError;

/// A collection in map-plane coordinates together with the bounds of every
/// coordinate it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCollection {
    pub collection: FeatureCollection<Vec2>,
    pub bounds: Aabb2,
}

/// Projects every coordinate of every feature, keeping geometry structure
/// and feature order, and accumulates the running bounding box.
pub fn project(collection: FeatureCollection<GeoPoint>) -> Result<ProjectedCollection, MapError> {
    let mut bounds = Aabb2::empty();
    let projected = collection.try_map_features(|(_, feature)| -> Result<_, MapError> {
        let feature_id = feature.id;
        let mut project_coord = |p: GeoPoint| -> Result<Vec2, MapError> {
            let v = mercator_forward(p.lon_deg, p.lat_deg).map_err(|source| {
                MapError::ProjectionDomain {
                    feature_id: feature_id.clone(),
                    source,
                }
            })?;
            bounds.extend(v);
            Ok(v)
        };
        let geometry = feature.geometry.try_map_coords(&mut project_coord)?;
        Ok(formats::Feature {
            id: feature_id,
            name: feature.name,
            properties: feature.properties,
            geometry,
        })
    })?;

    debug!(
        features = projected.len(),
        min_x = bounds.min[0],
        min_y = bounds.min[1],
        max_x = bounds.max[0],
        max_y = bounds.max[1],
        "projected collection"
    );
    Ok(ProjectedCollection {
        collection: projected,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::project;
    use crate::error::MapError;
    use formats::{Feature, FeatureCollection, GeoPoint, Geometry};
    use foundation::math::{ProjectionError, Vec2, mercator_forward, mercator_inverse};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn ring(coords: &[(f64, f64)]) -> Vec<GeoPoint> {
        coords.iter().map(|&(lon, lat)| GeoPoint::new(lon, lat)).collect()
    }

    #[test]
    fn keeps_structure_and_order() {
        let fc = FeatureCollection::new(vec![
            Feature::new(
                Some("mp".into()),
                Geometry::MultiPolygon(vec![
                    vec![ring(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)])],
                    vec![
                        ring(&[(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 5.0)]),
                        ring(&[(5.2, 5.2), (5.4, 5.2), (5.4, 5.4), (5.2, 5.2)]),
                    ],
                ]),
            ),
            Feature::new(Some("pt".into()), Geometry::Point(GeoPoint::new(-3.0, 40.0))),
        ]);

        let out = project(fc).expect("project");
        let features = &out.collection.features;
        assert_eq!(features[0].id.as_deref(), Some("mp"));
        assert_eq!(features[1].id.as_deref(), Some("pt"));
        match &features[0].geometry {
            Geometry::MultiPolygon(polys) => {
                assert_eq!(polys.len(), 2);
                assert_eq!(polys[0].len(), 1);
                assert_eq!(polys[1].len(), 2);
                assert_eq!(polys[1][1].len(), 4);
            }
            other => panic!("unexpected geometry: {other:?}"),
        }
        match features[1].geometry {
            Geometry::Point(p) => {
                let (lon, lat) = mercator_inverse(p);
                assert_close(lon, -3.0, 1e-9);
                assert_close(lat, 40.0, 1e-9);
            }
            ref other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[test]
    fn bounds_contain_every_projected_coordinate() {
        let fc = FeatureCollection::new(vec![
            Feature::new(
                Some("line".into()),
                Geometry::LineString(ring(&[(-10.0, 35.0), (30.0, 70.0)])),
            ),
            Feature::new(
                Some("poly".into()),
                Geometry::Polygon(vec![ring(&[(0.0, -20.0), (4.0, -20.0), (4.0, -18.0)])]),
            ),
        ]);
        let out = project(fc).expect("project");
        assert!(out.bounds.width() >= 0.0 && out.bounds.height() >= 0.0);

        let mut seen = 0;
        for feature in &out.collection.features {
            feature.geometry.for_each_coord(|v: &Vec2| {
                assert!(out.bounds.contains(*v), "{v:?} outside {:?}", out.bounds);
                seen += 1;
            });
        }
        assert_eq!(seen, 5);

        let north = mercator_forward(30.0, 70.0).expect("project");
        let south = mercator_forward(0.0, -20.0).expect("project");
        assert_close(out.bounds.min[1], north.y, 1e-12);
        assert_close(out.bounds.max[1], south.y, 1e-12);
        assert_close(out.bounds.min[0], -10.0, 1e-9);
        assert_close(out.bounds.max[0], 30.0, 1e-9);
    }

    #[test]
    fn single_coordinate_gives_degenerate_bounds() {
        let fc = FeatureCollection::new(vec![Feature::new(
            Some("p".into()),
            Geometry::Point(GeoPoint::new(13.4, 52.5)),
        )]);
        let out = project(fc).expect("project");
        assert_eq!(out.bounds.width(), 0.0);
        assert_eq!(out.bounds.height(), 0.0);
        assert_eq!(out.bounds.min, out.bounds.max);
    }

    #[test]
    fn pole_coordinate_aborts_projection() {
        let fc = FeatureCollection::new(vec![
            Feature::new(Some("ok".into()), Geometry::Point(GeoPoint::new(0.0, 0.0))),
            Feature::new(
                Some("aq".into()),
                Geometry::Polygon(vec![ring(&[(0.0, -80.0), (10.0, -90.0), (0.0, -80.0)])]),
            ),
        ]);
        let err = project(fc).expect_err("pole");
        assert_eq!(
            err,
            MapError::ProjectionDomain {
                feature_id: Some("aq".to_string()),
                source: ProjectionError::LatitudeOutOfDomain { lat_deg: -90.0 },
            }
        );
    }

    #[test]
    fn city_marker_state_survives_projection() {
        let fc = FeatureCollection::new(vec![]).append_city_markers_with(Vec::new);
        let out = project(fc).expect("project");
        assert!(out.collection.cities_added());
        assert!(out.bounds.is_empty());
    }
}
