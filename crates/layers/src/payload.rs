use foundation::Aabb2;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangular window of the projected plane, in SVG `viewBox` order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Viewport enclosing `bounds` plus `padding` on every side. Empty
    /// bounds give a zero-sized viewport at the origin.
    pub fn from_bounds(bounds: &Aabb2, padding: f64) -> Self {
        if bounds.is_empty() {
            return Self::default();
        }
        Self {
            x: bounds.min[0] - padding,
            y: bounds.min[1] - padding,
            width: bounds.width() + 2.0 * padding,
            height: bounds.height() + 2.0 * padding,
        }
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// `"x y width height"` as used by the SVG `viewBox` attribute.
    pub fn view_box(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// Serialized map ready for a render surface. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderablePayload {
    path_markup: String,
    marker_markup: String,
    viewport: Viewport,
}

impl RenderablePayload {
    pub fn new(path_markup: String, marker_markup: String, viewport: Viewport) -> Self {
        Self {
            path_markup,
            marker_markup,
            viewport,
        }
    }

    /// `<path>` elements for polygonal and line features.
    pub fn path_markup(&self) -> &str {
        &self.path_markup
    }

    /// `<circle>` elements for point features, layered above the paths.
    pub fn marker_markup(&self) -> &str {
        &self.marker_markup
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// BLAKE3 hex digest of the markup and viewport. Identical inputs to the
    /// assembler give identical digests.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.path_markup.as_bytes());
        hasher.update(&[0]);
        hasher.update(self.marker_markup.as_bytes());
        hasher.update(&[0]);
        for v in [
            self.viewport.x,
            self.viewport.y,
            self.viewport.width,
            self.viewport.height,
        ] {
            hasher.update(&v.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Standalone SVG document with paths beneath markers.
    pub fn to_svg_document(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}">{}{}</svg>"#,
            self.viewport.view_box(),
            self.path_markup,
            self.marker_markup
        )
    }
}
