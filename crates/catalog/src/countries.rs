/// Reference entry mapping a lowercase country code to its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryEntry {
    pub code: &'static str,
    pub name: &'static str,
}

const fn entry(code: &'static str, name: &'static str) -> CountryEntry {
    CountryEntry { code, name }
}

/// Display names for the regions the map can select, keyed by lowercase code.
pub const COUNTRIES: &[CountryEntry] = &[
    entry("de", "Deutschland"),
    entry("ch", "Schweiz"),
    entry("eu", "Europäische Union"),
    entry("all", "Europa"),
    entry("at", "Österreich"),
    entry("be", "Belgien"),
    entry("bg", "Bulgarien"),
    entry("cz", "Tschechische Republik"),
    entry("dk", "Dänemark"),
    entry("ee", "Estland"),
    entry("es", "Spanien"),
    entry("fi", "Finnland"),
    entry("fr", "Frankreich"),
    entry("ge", "Georgien"),
    entry("gr", "Griechenland"),
    entry("hr", "Kroatien"),
    entry("hu", "Ungarn"),
    entry("ie", "Irland"),
    entry("it", "Italien"),
    entry("lt", "Litauen"),
    entry("lu", "Luxemburg"),
    entry("lv", "Lettland"),
    entry("me", "Montenegro"),
    entry("mk", "Nordmazedonien"),
    entry("nl", "Niederlande"),
    entry("no", "Norwegen"),
    entry("pl", "Polen"),
    entry("pt", "Portugal"),
    entry("ro", "Rumänien"),
    entry("rs", "Serbien"),
    entry("se", "Schweden"),
    entry("sk", "Slowakische Republik"),
    entry("xk", "Kosovo"),
];

/// Case-insensitive lookup of a display name.
pub fn country_name(code: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .map(|c| c.name)
}

/// Entries sorted by display name, as shown in region pickers.
pub fn countries_by_name() -> Vec<CountryEntry> {
    let mut out = COUNTRIES.to_vec();
    out.sort_by(|a, b| a.name.cmp(b.name));
    out
}
