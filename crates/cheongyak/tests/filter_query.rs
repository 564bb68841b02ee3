use cheongyak::listings::catalog::{resident_catalog, HOUSE_TYPES, SIZE_PRESETS};
use cheongyak::listings::{
    decode, encode, encode_submission, AmountRange, FilterSelection, ListingStatus, SizeBand,
    SortDirection, SortKey,
};

fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}

fn selection_from_form() -> FilterSelection {
    let mut selection = FilterSelection::default();
    selection.toggle_region("부산");
    selection.toggle_region("서울");
    for house_type in HOUSE_TYPES.iter().take(2) {
        selection.toggle_house_type(house_type);
    }
    for preset in SIZE_PRESETS.iter().skip(3) {
        selection.toggle_size_band(preset.band);
    }
    selection.set_deposit_range(AmountRange::new(Some(100), Some(25_000)));
    selection.set_rent_range(AmountRange::new(Some(5), None));
    for resident in resident_catalog().iter().filter(|r| r.starts_with("신혼")) {
        selection.toggle_resident(resident);
    }
    selection.set_status(Some(ListingStatus::Planned));
    selection.toggle_sort(SortKey::Deposit, SortDirection::Descending);
    selection
}

#[test]
fn form_selection_survives_a_round_trip() {
    let selection = selection_from_form().with_page(2);
    let decoded = decode(&encode(&selection));

    assert_eq!(sorted(decoded.regions.clone()), sorted(selection.regions.clone()));
    assert_eq!(decoded.house_types, selection.house_types);
    assert_eq!(decoded.size_bands, selection.size_bands);
    assert_eq!(decoded.residents, vec!["신혼부부", "신혼부부(주거약자용)"]);
    assert_eq!(decoded, selection);
}

#[test]
fn unbounded_size_band_round_trips_through_trailing_comma() {
    let mut selection = FilterSelection::default();
    selection.toggle_size_band(SizeBand::new(25.0, None));

    let encoded = encode(&selection);
    assert_eq!(encoded, "sizes=25.0%2C&page=1");
    assert_eq!(decode(&encoded).size_bands, vec![SizeBand::new(25.0, None)]);
}

#[test]
fn repeated_region_keys_match_comma_list() {
    let expected = vec!["서울".to_string(), "경기".to_string()];
    assert_eq!(decode("region=서울&region=경기").regions, expected);
    assert_eq!(decode("region=서울,경기").regions, expected);
    assert_eq!(
        decode("region=%EC%84%9C%EC%9A%B8%2C%EA%B2%BD%EA%B8%B0").regions,
        expected
    );
}

#[test]
fn fresh_submission_lands_on_first_page() {
    let selection = selection_from_form().with_page(7);
    assert!(encode(&selection).ends_with("page=7"));
    assert!(encode_submission(&selection).ends_with("page=1"));
}

#[test]
fn sort_toggle_cycles_back_to_inactive() {
    let selection = FilterSelection::default();
    let once = selection.with_sort_toggled(SortKey::Rent, SortDirection::Ascending);
    assert!(encode(&once).contains("ordering=rent"));

    let twice = once.with_sort_toggled(SortKey::Rent, SortDirection::Ascending);
    assert_eq!(twice.sort, None);
    assert_eq!(encode(&twice), "page=1");
}

#[test]
fn empty_query_decodes_to_default() {
    assert_eq!(decode(""), FilterSelection::default());
    assert_eq!(decode("?"), FilterSelection::default());
    assert!(decode("utm_source=kakao").is_unfiltered());
}

#[test]
fn fractional_size_bands_survive_a_round_trip() {
    let mut selection = FilterSelection::default();
    selection.toggle_size_band(SizeBand::new(12.25, Some(18.75)));
    selection.toggle_size_band(SizeBand::new(30.5, None));

    let encoded = encode(&selection);
    assert!(encoded.contains("12.25%2C18.75"));
    assert_eq!(decode(&encoded).size_bands, selection.size_bands);
}
