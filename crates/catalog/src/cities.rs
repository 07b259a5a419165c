use formats::GeoPoint;

/// Reference city shown as a marker on every map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityEntry {
    pub name: &'static str,
    pub coordinate: GeoPoint,
}

const fn city(name: &'static str, lon_deg: f64, lat_deg: f64) -> CityEntry {
    CityEntry {
        name,
        coordinate: GeoPoint { lon_deg, lat_deg },
    }
}

pub const CITIES: &[CityEntry] = &[
    city("Berlin", 13.405, 52.52),
    city("Dresden", 13.7373, 51.0504),
    city("Leipzig", 12.3731, 51.3397),
    city("München", 11.582, 48.1351),
    city("Hamburg", 9.9937, 53.5511),
    city("Köln", 6.9603, 50.9375),
    city("Zürich", 8.5417, 47.3769),
    city("Wien", 16.3738, 48.2082),
    city("Paris", 2.3522, 48.8566),
    city("Prag", 14.4378, 50.0755),
    city("Warschau", 21.0122, 52.2297),
    city("Amsterdam", 4.9041, 52.3676),
];
