//! Browser bindings for the SVG world map.
//!
//! The host page injects `get_path_markup() + get_marker_markup()` into an
//! `<svg>` element, sets its `viewBox` from `get_view_box()`, and forwards
//! pointer events. State lives in one thread-local viewer per page.

use std::cell::RefCell;

use foundation::math::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod map_controller;
pub mod viewer;

use viewer::Viewer;

thread_local! {
    static VIEWER: RefCell<Viewer> = RefCell::new(Viewer::default());
}

fn with_viewer<F, R>(f: F) -> R
where
    F: FnOnce(&mut Viewer) -> R,
    R: Default,
{
    VIEWER
        .try_with(|viewer| f(&mut viewer.borrow_mut()))
        .unwrap_or_default()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    Ok(())
}

/// Requests the map for `tier` ("low" or "medium") with an optional
/// highlighted region. Returns whether the markup changed.
#[wasm_bindgen]
pub fn set_map(tier: &str, selected: Option<String>) -> Result<bool, JsValue> {
    VIEWER
        .try_with(|viewer| viewer.borrow_mut().request(tier, selected.as_deref()))
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn get_path_markup() -> String {
    with_viewer(|v| {
        v.payload()
            .map(|p| p.path_markup().to_string())
            .unwrap_or_default()
    })
}

#[wasm_bindgen]
pub fn get_marker_markup() -> String {
    with_viewer(|v| {
        v.payload()
            .map(|p| p.marker_markup().to_string())
            .unwrap_or_default()
    })
}

#[wasm_bindgen]
pub fn get_view_box() -> String {
    with_viewer(|v| v.controller().view_box())
}

#[wasm_bindgen]
pub fn is_panning() -> bool {
    with_viewer(|v| v.controller().is_panning())
}

/// Rendered size of the `<svg>` element in CSS pixels.
#[wasm_bindgen]
pub fn set_surface_size(width_px: f64, height_px: f64) {
    with_viewer(|v| v.controller_mut().set_surface_size(width_px, height_px));
}

#[wasm_bindgen]
pub fn pointer_down(x_px: f64, y_px: f64) {
    with_viewer(|v| v.controller_mut().on_pointer_down(Vec2::new(x_px, y_px)));
}

#[wasm_bindgen]
pub fn pointer_move(x_px: f64, y_px: f64) {
    with_viewer(|v| v.controller_mut().on_pointer_move(Vec2::new(x_px, y_px)));
}

#[wasm_bindgen]
pub fn pointer_up() {
    with_viewer(|v| v.controller_mut().on_pointer_up());
}

#[wasm_bindgen]
pub fn pointer_leave() {
    with_viewer(|v| v.controller_mut().on_pointer_leave());
}

/// `[lon_deg, lat_deg]` under a surface pixel.
#[wasm_bindgen]
pub fn get_pointer_lon_lat(x_px: f64, y_px: f64) -> Vec<f64> {
    with_viewer(|v| {
        let (lon, lat) = v.controller().pointer_to_lon_lat(Vec2::new(x_px, y_px));
        vec![lon, lat]
    })
}

#[derive(Serialize)]
struct CountryOption {
    code: &'static str,
    name: &'static str,
}

/// JSON array of `{code, name}` sorted by name, for region pickers.
#[wasm_bindgen]
pub fn get_countries_json() -> String {
    let options: Vec<CountryOption> = catalog::countries_by_name()
        .into_iter()
        .map(|c| CountryOption {
            code: c.code,
            name: c.name,
        })
        .collect();
    serde_json::to_string(&options).unwrap_or_default()
}
