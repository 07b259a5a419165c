//! Spherical Mercator projection onto the map plane.
//!
//! Longitude maps linearly to `x`, latitude maps through
//! `ln(tan(pi/4 + lat/2))`. Both axes share [`MERCATOR_SCALE`] so the
//! projection stays conformal, and `y` grows downward to match the SVG
//! coordinate system. With the chosen scale one projected unit equals one
//! degree of longitude, so the projected world is 360 units wide.

use std::f64::consts::FRAC_PI_4;
use std::fmt;

use super::Vec2;

/// Projected units per radian, applied identically to both axes.
pub const MERCATOR_SCALE: f64 = 180.0 / std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    /// The tangent in the Mercator formula diverges at the poles.
    LatitudeOutOfDomain { lat_deg: f64 },
    NonFinite { lon_deg: f64, lat_deg: f64 },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::LatitudeOutOfDomain { lat_deg } => {
                write!(f, "latitude {lat_deg} is outside the Mercator domain (-90, 90)")
            }
            ProjectionError::NonFinite { lon_deg, lat_deg } => {
                write!(f, "non-finite coordinate ({lon_deg}, {lat_deg})")
            }
        }
    }
}

impl std::error::Error for ProjectionError {}

pub fn is_mercator_lat_valid(lat_deg: f64) -> bool {
    lat_deg.is_finite() && lat_deg > -90.0 && lat_deg < 90.0
}

/// Projects a geographic coordinate (degrees) onto the map plane.
pub fn mercator_forward(lon_deg: f64, lat_deg: f64) -> Result<Vec2, ProjectionError> {
    if !lon_deg.is_finite() || !lat_deg.is_finite() {
        return Err(ProjectionError::NonFinite { lon_deg, lat_deg });
    }
    if !is_mercator_lat_valid(lat_deg) {
        return Err(ProjectionError::LatitudeOutOfDomain { lat_deg });
    }

    let x = lon_deg.to_radians() * MERCATOR_SCALE;
    let y = (FRAC_PI_4 + lat_deg.to_radians() * 0.5).tan().ln() * MERCATOR_SCALE;
    Ok(Vec2::new(x, -y))
}

/// Inverse of [`mercator_forward`]; returns `(lon_deg, lat_deg)`.
pub fn mercator_inverse(p: Vec2) -> (f64, f64) {
    let lon = (p.x / MERCATOR_SCALE).to_degrees();
    let lat = 2.0 * (-p.y / MERCATOR_SCALE).exp().atan() - std::f64::consts::FRAC_PI_2;
    (lon, lat.to_degrees())
}
