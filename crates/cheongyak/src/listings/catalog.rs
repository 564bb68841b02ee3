//! Controlled vocabularies offered by the filter form.
//!
//! The codec does not validate against these lists; the units API owns that.

use super::filter::SizeBand;

/// Regions the home-page search accepts and autocompletes.
pub const REGIONS: [&str; 16] = [
    "서울", "경기", "인천", "부산", "대구", "광주", "대전", "세종", "강원", "충북", "충남", "전북",
    "전남", "경북", "경남", "제주",
];

/// Home-page shortcuts.
pub const POPULAR_REGIONS: [&str; 8] = ["서울", "경기", "인천", "부산", "대구", "광주", "대전", "세종"];

/// Filter-form regions shown before the list is expanded.
pub const MAIN_REGIONS: [&str; 8] = ["서울", "경기", "인천", "부산", "대구", "광주", "대전", "울산"];

/// Filter-form regions behind the "more" toggle.
pub const ADDITIONAL_REGIONS: [&str; 9] = [
    "세종", "강원", "충북", "충남", "전북", "전남", "경북", "경남", "제주",
];

pub const HOUSE_TYPES: [&str; 4] = ["행복주택", "국민임대", "공공임대", "전세임대"];

pub const RESIDENT_BASES: [&str; 8] = [
    "대학생",
    "청년",
    "신혼부부",
    "한부모가족",
    "고령자",
    "주거급여수급자",
    "산업단지근로자",
    "기타",
];

const ACCESSIBLE_SUFFIX: &str = "(주거약자용)";

const INITIAL_CONSONANTS: [(&str, &[&str]); 5] = [
    ("ㄱ", &["강원", "경기", "경남", "경북", "광주"]),
    ("ㄷ", &["대구", "대전"]),
    ("ㅂ", &["부산"]),
    ("ㅅ", &["서울", "세종"]),
    ("ㅈ", &["전남", "전북", "제주"]),
];

pub struct SizePreset {
    pub label: &'static str,
    pub band: SizeBand,
}

pub const SIZE_PRESETS: [SizePreset; 5] = [
    SizePreset {
        label: "10평 이하",
        band: SizeBand::new(0.0, Some(10.0)),
    },
    SizePreset {
        label: "10평~15평",
        band: SizeBand::new(10.0, Some(15.0)),
    },
    SizePreset {
        label: "15평~20평",
        band: SizeBand::new(15.0, Some(20.0)),
    },
    SizePreset {
        label: "20평~25평",
        band: SizeBand::new(20.0, Some(25.0)),
    },
    SizePreset {
        label: "25평 이상",
        band: SizeBand::new(25.0, None),
    },
];

/// The `주거약자` variant of a resident category.
pub fn accessible_variant(base: &str) -> String {
    format!("{base}{ACCESSIBLE_SUFFIX}")
}

/// Base categories followed by their accessibility variants.
pub fn resident_catalog() -> Vec<String> {
    RESIDENT_BASES
        .iter()
        .map(|base| base.to_string())
        .chain(RESIDENT_BASES.iter().map(|base| accessible_variant(base)))
        .collect()
}

/// Every region the filter form offers: the main list, then the rest.
pub fn filter_regions() -> impl Iterator<Item = &'static str> {
    MAIN_REGIONS.iter().chain(ADDITIONAL_REGIONS.iter()).copied()
}

/// Whether the home-page search accepts `name`.
pub fn is_known_region(name: &str) -> bool {
    REGIONS.contains(&name.trim())
}

/// Autocomplete for the home-page search box. A lone initial consonant
/// expands to the regions starting with it.
pub fn suggest_regions(input: &str) -> Vec<&'static str> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    if let Some((_, regions)) = INITIAL_CONSONANTS
        .iter()
        .find(|(consonant, _)| *consonant == input)
    {
        return regions.to_vec();
    }

    REGIONS
        .iter()
        .copied()
        .filter(|region| region.starts_with(input))
        .collect()
}

pub fn size_preset_for(band: &SizeBand) -> Option<&'static SizePreset> {
    SIZE_PRESETS.iter().find(|preset| preset.band == *band)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consonant_expands_to_regions() {
        assert_eq!(suggest_regions("ㅅ"), vec!["서울", "세종"]);
        assert_eq!(suggest_regions("ㄷ"), vec!["대구", "대전"]);
    }

    #[test]
    fn prefix_matches_regions() {
        assert_eq!(suggest_regions("경"), vec!["경기", "경북", "경남"]);
        assert!(suggest_regions("").is_empty());
        assert!(suggest_regions("런던").is_empty());
    }

    #[test]
    fn catalog_includes_accessible_variants() {
        let catalog = resident_catalog();
        assert_eq!(catalog.len(), RESIDENT_BASES.len() * 2);
        assert!(catalog.contains(&"고령자(주거약자용)".to_string()));
    }

    #[test]
    fn filter_form_offers_ulsan_but_search_does_not() {
        let regions: Vec<&str> = filter_regions().collect();
        assert_eq!(regions.len(), 17);
        assert!(regions.contains(&"울산"));
        assert!(regions.contains(&"세종"));
        assert!(!is_known_region("울산"));
        assert!(is_known_region(" 세종 "));
        assert!(!POPULAR_REGIONS.contains(&"울산"));
    }

    #[test]
    fn unbounded_preset_is_found() {
        let preset = size_preset_for(&SizeBand::new(25.0, None)).expect("preset exists");
        assert_eq!(preset.label, "25평 이상");
    }
}
