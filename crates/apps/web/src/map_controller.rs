//! Drag-to-pan controller for the SVG map.
//!
//! The controller owns the live viewport of one render surface:
//! - pointer drags move the viewport origin opposite to the pointer, scaled
//!   from screen pixels to map units by `viewport size / surface size`
//! - width and height never change (no zoom)
//! - a new payload replaces the viewport and drops any pan offset
//!
//! Panning past the data bounds is allowed and simply shows empty space.

use foundation::math::{Vec2, mercator_inverse};
use layers::{RenderablePayload, Viewport};

/// Fallback surface size before the host reports one.
const DEFAULT_SURFACE_PX: Vec2 = Vec2 { x: 1280.0, y: 720.0 };

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    /// Pointer is held down; `last_pos_px` is where the previous event was.
    Panning { last_pos_px: Vec2 },
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: Viewport,
    surface_px: Vec2,
    state: PanState,
}

impl ViewportController {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            surface_px: DEFAULT_SURFACE_PX,
            state: PanState::Idle,
        }
    }

    pub fn from_payload(payload: &RenderablePayload) -> Self {
        Self::new(payload.viewport())
    }

    /// Adopts the viewport of a newly arrived payload, discarding any pan
    /// offset. A drag in progress keeps going from the new origin.
    pub fn reset(&mut self, payload: &RenderablePayload) {
        self.viewport = payload.viewport();
    }

    /// On-screen size of the render surface in pixels.
    pub fn set_surface_size(&mut self, width_px: f64, height_px: f64) {
        self.surface_px = Vec2::new(width_px.max(1.0), height_px.max(1.0));
    }

    pub fn surface_size(&self) -> Vec2 {
        self.surface_px
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn view_box(&self) -> String {
        self.viewport.view_box()
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, PanState::Panning { .. })
    }

    /// Handle pointer press.
    pub fn on_pointer_down(&mut self, pos_px: Vec2) {
        self.state = PanState::Panning {
            last_pos_px: pos_px,
        };
    }

    /// Handle pointer move. Ignored unless a drag is in progress.
    pub fn on_pointer_move(&mut self, pos_px: Vec2) {
        let PanState::Panning { last_pos_px } = self.state else {
            return;
        };

        let delta_px = last_pos_px - pos_px;
        let origin = self.viewport.origin() + delta_px.scale_by(self.units_per_px());
        self.viewport.x = origin.x;
        self.viewport.y = origin.y;
        self.state = PanState::Panning {
            last_pos_px: pos_px,
        };
    }

    /// Handle pointer release.
    pub fn on_pointer_up(&mut self) {
        self.state = PanState::Idle;
    }

    /// Handle the pointer leaving the surface; ends any drag.
    pub fn on_pointer_leave(&mut self) {
        self.state = PanState::Idle;
    }

    /// Map-plane position under a surface pixel.
    pub fn pointer_to_projected(&self, pos_px: Vec2) -> Vec2 {
        self.viewport.origin() + pos_px.scale_by(self.units_per_px())
    }

    /// `(lon_deg, lat_deg)` under a surface pixel.
    pub fn pointer_to_lon_lat(&self, pos_px: Vec2) -> (f64, f64) {
        mercator_inverse(self.pointer_to_projected(pos_px))
    }

    fn units_per_px(&self) -> Vec2 {
        Vec2::new(
            self.viewport.width / self.surface_px.x,
            self.viewport.height / self.surface_px.y,
        )
    }
}
