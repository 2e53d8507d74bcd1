// Classification of the raw results: parties, regions and province names.

use permanence_ratios::{Party, Region};

// Checked in order, the first match wins.
const PARTY_MARKERS: [(&str, Party); 5] = [
    ("Conservative", Party::Conservative),
    ("Liberal", Party::Liberal),
    ("New Democratic", Party::NDP),
    ("Green", Party::Green),
    ("Bloc Québécois", Party::Bloc),
];

const REGION_MARKERS: [(&str, Region); 13] = [
    ("British Columbia", Region::BC),
    ("Alberta", Region::Alberta),
    ("Manitoba", Region::Prairies),
    ("Saskatchewan", Region::Prairies),
    ("Ontario", Region::Ontario),
    ("Quebec", Region::Quebec),
    ("Newfoundland and Labrador", Region::Atlantic),
    ("Prince Edward Island", Region::Atlantic),
    ("Nova Scotia", Region::Atlantic),
    ("New Brunswick", Region::Atlantic),
    ("Yukon", Region::Territories),
    ("Northwest Territories", Region::Territories),
    ("Nunavut", Region::Territories),
];

const SHORT_PROVINCES: [(&str, &str); 7] = [
    ("British Columbia", "BC"),
    ("Quebec", "Quebec"),
    ("Newfoundland and Labrador", "Newfoundland"),
    ("Prince Edward Island", "PEI"),
    ("Nova Scotia", "Nova Scotia"),
    ("New Brunswick", "New Brunswick"),
    ("Northwest Territories", "NWT"),
];

/// The tracked party of a candidate, from the party label included in the candidate field.
/// Returns `None` for the other parties and the independents.
pub fn classify_party(candidate: &str) -> Option<Party> {
    PARTY_MARKERS
        .iter()
        .find(|(marker, _)| candidate.contains(marker))
        .map(|(_, party)| *party)
}

pub fn classify_region(province: &str) -> Option<Region> {
    REGION_MARKERS
        .iter()
        .find(|(marker, _)| province.contains(marker))
        .map(|(_, region)| *region)
}

/// The short English name of a province, as used for display.
pub fn short_province(province: &str) -> String {
    if let Some((_, short)) = SHORT_PROVINCES.iter().find(|(m, _)| province.contains(m)) {
        return short.to_string();
    }
    // Bilingual names are written "English/French".
    province
        .split('/')
        .next()
        .unwrap_or(province)
        .trim()
        .to_string()
}
