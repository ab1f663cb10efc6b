//! District and province lookup for free-text Sri Lankan addresses.

/// One keyword in the lookup table.
#[derive(Debug, Clone, Copy)]
pub struct DistrictEntry {
    pub keyword: &'static str,
    pub district: &'static str,
    pub province: &'static str,
}

const fn entry(keyword: &'static str, district: &'static str, province: &'static str) -> DistrictEntry {
    DistrictEntry {
        keyword,
        district,
        province,
    }
}

/// Checked in order; the first keyword contained in the address wins.
/// District names come first so an address naming its district resolves to
/// it even when a town keyword from another district also appears.
pub static DISTRICTS: &[DistrictEntry] = &[
    entry("colombo", "Colombo", "Western"),
    entry("gampaha", "Gampaha", "Western"),
    entry("kalutara", "Kalutara", "Western"),
    entry("kandy", "Kandy", "Central"),
    entry("matale", "Matale", "Central"),
    entry("nuwara eliya", "Nuwara Eliya", "Central"),
    entry("galle", "Galle", "Southern"),
    entry("matara", "Matara", "Southern"),
    entry("hambantota", "Hambantota", "Southern"),
    entry("jaffna", "Jaffna", "Northern"),
    entry("kilinochchi", "Kilinochchi", "Northern"),
    entry("mannar", "Mannar", "Northern"),
    entry("mullaitivu", "Mullaitivu", "Northern"),
    entry("vavuniya", "Vavuniya", "Northern"),
    entry("batticaloa", "Batticaloa", "Eastern"),
    entry("ampara", "Ampara", "Eastern"),
    entry("trincomalee", "Trincomalee", "Eastern"),
    entry("kurunegala", "Kurunegala", "North Western"),
    entry("puttalam", "Puttalam", "North Western"),
    entry("anuradhapura", "Anuradhapura", "North Central"),
    entry("polonnaruwa", "Polonnaruwa", "North Central"),
    entry("badulla", "Badulla", "Uva"),
    entry("monaragala", "Monaragala", "Uva"),
    entry("ratnapura", "Ratnapura", "Sabaragamuwa"),
    entry("kegalle", "Kegalle", "Sabaragamuwa"),
    // towns
    entry("nugegoda", "Colombo", "Western"),
    entry("dehiwala", "Colombo", "Western"),
    entry("mount lavinia", "Colombo", "Western"),
    entry("maharagama", "Colombo", "Western"),
    entry("battaramulla", "Colombo", "Western"),
    entry("rajagiriya", "Colombo", "Western"),
    entry("kotte", "Colombo", "Western"),
    entry("malabe", "Colombo", "Western"),
    entry("kaduwela", "Colombo", "Western"),
    entry("moratuwa", "Colombo", "Western"),
    entry("piliyandala", "Colombo", "Western"),
    entry("negombo", "Gampaha", "Western"),
    entry("wattala", "Gampaha", "Western"),
    entry("kelaniya", "Gampaha", "Western"),
    entry("kadawatha", "Gampaha", "Western"),
    entry("ja-ela", "Gampaha", "Western"),
    entry("panadura", "Kalutara", "Western"),
    entry("horana", "Kalutara", "Western"),
    entry("peradeniya", "Kandy", "Central"),
    entry("katugastota", "Kandy", "Central"),
    entry("hikkaduwa", "Galle", "Southern"),
    entry("weligama", "Matara", "Southern"),
    entry("chilaw", "Puttalam", "North Western"),
    entry("bandarawela", "Badulla", "Uva"),
];

/// Resolve `(district, province)` from an address, or empty strings when no
/// keyword is present.
pub fn resolve(free_text: &str) -> (String, String) {
    resolve_entry(free_text)
        .map(|e| (e.district.to_string(), e.province.to_string()))
        .unwrap_or_default()
}

pub fn resolve_entry(free_text: &str) -> Option<&'static DistrictEntry> {
    let lowered = free_text.to_lowercase();
    DISTRICTS.iter().find(|e| lowered.contains(e.keyword))
}
