//! Projected features to SVG primitives.
//!
//! Polygons and lines become `<path>` elements, points become `<circle>`
//! markers. The two kinds accumulate into separate strings so markers can
//! be layered above outlines; within each string primitives follow input
//! feature order, so later features paint over earlier ones.

use std::fmt::Write;

use formats::{Feature, Geometry};
use foundation::math::{Vec2, format_fixed};
use tracing::debug;

use crate::augment::{PROP_FILL, PROP_STROKE, PROP_STROKE_WIDTH};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::payload::{RenderablePayload, Viewport};
use crate::project::ProjectedCollection;

const STYLE_KEYS: [&str; 3] = [PROP_FILL, PROP_STROKE, PROP_STROKE_WIDTH];

/// Serializes a projected collection; the viewport comes from its bounds.
pub fn serialize(
    projected: &ProjectedCollection,
    config: &MapConfig,
) -> Result<RenderablePayload, MapError> {
    let precision = config.coordinate_precision;
    let mut paths = String::new();
    let mut markers = String::new();
    let mut path_count = 0usize;
    let mut marker_count = 0usize;

    for feature in &projected.collection.features {
        match &feature.geometry {
            Geometry::Polygon(rings) => {
                let mut d = String::new();
                write_rings(&mut d, rings, precision);
                write_path(&mut paths, feature, &d);
                path_count += 1;
            }
            Geometry::MultiPolygon(polys) => {
                let mut d = String::new();
                for rings in polys {
                    write_rings(&mut d, rings, precision);
                }
                write_path(&mut paths, feature, &d);
                path_count += 1;
            }
            Geometry::LineString(points) => {
                let mut d = String::new();
                write_polyline(&mut d, points, precision);
                write_path(&mut paths, feature, &d);
                path_count += 1;
            }
            Geometry::Point(p) => {
                write_marker(&mut markers, feature, *p, config);
                marker_count += 1;
            }
            Geometry::MultiPoint(_) | Geometry::MultiLineString(_) => {
                return Err(MapError::UnsupportedGeometry {
                    feature_id: feature.id.clone(),
                    kind: feature.geometry.kind(),
                });
            }
        }
    }

    let viewport = Viewport::from_bounds(&projected.bounds, config.viewport_padding);
    debug!(
        paths = path_count,
        markers = marker_count,
        view_box = %viewport.view_box(),
        "serialized collection"
    );
    Ok(RenderablePayload::new(paths, markers, viewport))
}

/// Appends one closed subpath per ring.
fn write_rings(d: &mut String, rings: &[Vec<Vec2>], precision: u32) {
    for ring in rings {
        if write_polyline(d, ring, precision) {
            d.push('Z');
        }
    }
}

/// Appends `M` to the first vertex and `L` to the rest. Returns whether
/// anything was written.
fn write_polyline(d: &mut String, points: &[Vec2], precision: u32) -> bool {
    for (i, p) in points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        let _ = write!(
            d,
            "{},{}",
            format_fixed(p.x, precision),
            format_fixed(p.y, precision)
        );
    }
    !points.is_empty()
}

fn write_path(out: &mut String, feature: &Feature<Vec2>, d: &str) {
    out.push_str("<path");
    write_identity(out, feature);
    let _ = write!(out, r#" d="{d}""#);
    write_style(out, feature);
    out.push_str("/>");
}

fn write_marker(out: &mut String, feature: &Feature<Vec2>, p: Vec2, config: &MapConfig) {
    let precision = config.coordinate_precision;
    out.push_str("<circle");
    write_identity(out, feature);
    let _ = write!(
        out,
        r#" cx="{}" cy="{}" r="{}""#,
        format_fixed(p.x, precision),
        format_fixed(p.y, precision),
        config.marker_radius
    );
    write_style(out, feature);
    out.push_str("/>");
}

fn write_identity(out: &mut String, feature: &Feature<Vec2>) {
    if let Some(id) = &feature.id {
        let _ = write!(out, r#" id="{}""#, xml_escape(id));
    }
    if let Some(name) = &feature.name {
        let _ = write!(out, r#" data-name="{}""#, xml_escape(name));
    }
}

/// Emits only the style properties the feature carries; the consumer
/// supplies defaults for the rest.
fn write_style(out: &mut String, feature: &Feature<Vec2>) {
    for key in STYLE_KEYS {
        if let Some(value) = feature.property_str(key) {
            let _ = write!(out, r#" {key}="{}""#, xml_escape(&value));
        }
    }
}

/// Escape the five XML special characters for attribute values.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
