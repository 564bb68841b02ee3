//! Query-string mapping for [`FilterSelection`].
//!
//! Two spellings exist. The browser query (`encode`/`decode`) is what the
//! listing page links to; the units API query (`api_query`) is what gets
//! proxied upstream. Multi-valued fields join with `,`, except size bands in
//! the browser query which join with `|` because each token already contains
//! a comma. Amounts are held in 만원 and written in 원. Blank list entries and
//! amounts too large to express in 원 are left out of both spellings.

use super::filter::{
    insert_unique, AmountRange, FilterSelection, ListingStatus, SizeBand, Sort, SortDirection,
    SortKey,
};
use crate::money::WON_PER_MANWON;
use url::form_urlencoded;

const LIST_SEPARATOR: &str = ",";
const SIZE_SEPARATOR: &str = "|";

/// Browser query for `selection`, keeping its page. Empty fields are omitted
/// and `page` always comes last.
pub fn encode(selection: &FilterSelection) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if let Some(regions) = join_list(&selection.regions) {
        serializer.append_pair("region", &regions);
    }
    if let Some(house_types) = join_list(&selection.house_types) {
        serializer.append_pair("houseTypes", &house_types);
    }
    if !selection.size_bands.is_empty() {
        let tokens: Vec<String> = selection.size_bands.iter().map(SizeBand::token).collect();
        serializer.append_pair("sizes", &tokens.join(SIZE_SEPARATOR));
    }
    for (key, value) in amount_pairs(selection) {
        serializer.append_pair(key, &value);
    }
    if let Some(status) = selection.status {
        serializer.append_pair("status", status.as_param());
    }
    if let Some(residents) = join_list(&selection.residents) {
        serializer.append_pair("residents", &residents);
    }
    if let Some(sort) = selection.sort {
        serializer.append_pair("ordering", &sort.ordering());
    }
    serializer.append_pair("page", &selection.page.max(1).to_string());

    serializer.finish()
}

/// Browser query for a fresh filter submission: always lands on page 1.
pub fn encode_submission(selection: &FilterSelection) -> String {
    encode(&selection.with_page(1))
}

/// Decodes a browser query (with or without the leading `?`).
///
/// Never fails: repeated keys and comma lists merge into one set, malformed
/// tokens are dropped, and unknown keys are ignored. The units API spellings
/// (`house_types`, `size`) and the form's 만원 amount fields (`*_man`) are
/// accepted as well.
pub fn decode(query: &str) -> FilterSelection {
    let query = query.trim().trim_start_matches('?');
    let mut selection = FilterSelection::default();
    let mut ordering: Option<Sort> = None;
    let mut legacy_sort: Option<Sort> = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "region" => merge_list(&mut selection.regions, &value),
            "houseTypes" | "house_types" => merge_list(&mut selection.house_types, &value),
            "residents" => merge_list(&mut selection.residents, &value),
            "sizes" => {
                for band in value.split(SIZE_SEPARATOR).filter_map(SizeBand::parse_token) {
                    insert_unique(&mut selection.size_bands, band);
                }
            }
            "size" => {
                for band in parse_flat_size_list(&value) {
                    insert_unique(&mut selection.size_bands, band);
                }
            }
            "deposit_min" => set_won(&mut selection.deposit_range.min, &value),
            "deposit_max" => set_won(&mut selection.deposit_range.max, &value),
            "rent_min" => set_won(&mut selection.rent_range.min, &value),
            "rent_max" => set_won(&mut selection.rent_range.max, &value),
            "deposit_min_man" => set_manwon(&mut selection.deposit_range.min, &value),
            "deposit_max_man" => set_manwon(&mut selection.deposit_range.max, &value),
            "rent_min_man" => set_manwon(&mut selection.rent_range.min, &value),
            "rent_max_man" => set_manwon(&mut selection.rent_range.max, &value),
            "status" => {
                if let Some(status) = ListingStatus::from_param(&value) {
                    selection.status = Some(status);
                }
            }
            "ordering" => {
                if let Some(sort) = Sort::from_ordering(&value) {
                    ordering = Some(sort);
                }
            }
            "deposit" => {
                if let Some(direction) = SortDirection::from_label(&value) {
                    legacy_sort = Some(Sort::new(SortKey::Deposit, direction));
                }
            }
            "monthly" => {
                if let Some(direction) = SortDirection::from_label(&value) {
                    legacy_sort = Some(Sort::new(SortKey::Rent, direction));
                }
            }
            "page" => {
                if let Some(page) = value.trim().parse::<u32>().ok().filter(|page| *page > 0) {
                    selection.page = page;
                }
            }
            _ => {}
        }
    }

    selection.sort = ordering.or(legacy_sort);
    selection
}

/// Query pairs for `GET /api/units/`. Amounts go out in 원, regions repeat
/// the key, and size tokens are flattened into one comma list.
pub fn api_query(selection: &FilterSelection, page_size: u32) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("page", selection.page.max(1).to_string()),
        ("page_size", page_size.to_string()),
    ];

    for region in non_blank(&selection.regions) {
        pairs.push(("region", region.to_string()));
    }
    if let Some(house_types) = join_list(&selection.house_types) {
        pairs.push(("house_types", house_types));
    }
    if !selection.size_bands.is_empty() {
        let tokens: Vec<String> = selection.size_bands.iter().map(SizeBand::token).collect();
        pairs.push(("size", tokens.join(",")));
    }
    pairs.extend(amount_pairs(selection));
    if let Some(status) = selection.status {
        pairs.push(("status", status.as_param().to_string()));
    }
    if let Some(residents) = join_list(&selection.residents) {
        pairs.push(("residents", residents));
    }
    if let Some(sort) = selection.sort {
        pairs.push(("ordering", sort.ordering()));
    }

    pairs
}

fn amount_pairs(selection: &FilterSelection) -> Vec<(&'static str, String)> {
    let ranges: [(&'static str, &'static str, &AmountRange); 2] = [
        ("deposit_min", "deposit_max", &selection.deposit_range),
        ("rent_min", "rent_max", &selection.rent_range),
    ];

    let mut pairs = Vec::new();
    for (min_key, max_key, range) in ranges {
        if let Some(min) = range.min.and_then(manwon_to_won_param) {
            pairs.push((min_key, min));
        }
        if let Some(max) = range.max.and_then(manwon_to_won_param) {
            pairs.push((max_key, max));
        }
    }
    pairs
}

/// `None` when the amount overflows 원.
fn manwon_to_won_param(manwon: u64) -> Option<String> {
    manwon
        .checked_mul(WON_PER_MANWON)
        .map(|won| won.to_string())
}

fn non_blank(values: &[String]) -> impl Iterator<Item = &str> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// `None` when nothing but blanks is left.
fn join_list(values: &[String]) -> Option<String> {
    let joined = non_blank(values).collect::<Vec<_>>().join(LIST_SEPARATOR);
    (!joined.is_empty()).then_some(joined)
}

fn merge_list(target: &mut Vec<String>, raw: &str) {
    for value in raw.split(LIST_SEPARATOR) {
        let value = value.trim();
        if !value.is_empty() {
            insert_unique(target, value.to_string());
        }
    }
}

/// `"0.0,10.0,25.0,"` → `[0,10)`, `[25,∞)`. A dangling lower bound with no
/// separator after it is dropped.
fn parse_flat_size_list(raw: &str) -> Vec<SizeBand> {
    let parts: Vec<&str> = raw.split(',').collect();
    parts
        .chunks(2)
        .filter(|pair| pair.len() == 2)
        .filter_map(|pair| SizeBand::parse_token(&format!("{},{}", pair[0], pair[1])))
        .collect()
}

/// 원 → 만원, rounding to the nearest 만원. Blank or non-numeric input leaves
/// the bound unset.
fn set_won(target: &mut Option<u64>, raw: &str) {
    if let Ok(won) = raw.trim().parse::<u64>() {
        *target = Some(won.saturating_add(WON_PER_MANWON / 2) / WON_PER_MANWON);
    }
}

/// Amounts that would overflow once written back in 원 are ignored, matching
/// what `encode` drops.
fn set_manwon(target: &mut Option<u64>, raw: &str) {
    if let Ok(manwon) = raw.trim().parse::<u64>() {
        if manwon_to_won_param(manwon).is_some() {
            *target = Some(manwon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FilterSelection {
        FilterSelection {
            regions: vec!["서울".to_string(), "경기".to_string()],
            house_types: vec!["행복주택".to_string(), "공공임대".to_string()],
            size_bands: vec![
                SizeBand::new(0.0, Some(10.0)),
                SizeBand::new(25.0, None),
            ],
            deposit_range: AmountRange::new(Some(500), Some(10_000)),
            rent_range: AmountRange::new(None, Some(50)),
            residents: vec!["청년".to_string(), "고령자(주거약자용)".to_string()],
            status: Some(ListingStatus::Ongoing),
            sort: Some(Sort::new(SortKey::Rent, SortDirection::Descending)),
            page: 3,
        }
    }

    #[test]
    fn default_selection_encodes_page_only() {
        assert_eq!(encode(&FilterSelection::default()), "page=1");
    }

    #[test]
    fn encode_orders_keys_and_puts_page_last() {
        let encoded = encode(&sample());
        let keys: Vec<String> = form_urlencoded::parse(encoded.as_bytes())
            .map(|(key, _)| key.into_owned())
            .collect();
        assert_eq!(
            keys,
            vec![
                "region",
                "houseTypes",
                "sizes",
                "deposit_min",
                "deposit_max",
                "rent_max",
                "status",
                "residents",
                "ordering",
                "page"
            ]
        );
    }

    #[test]
    fn amounts_are_written_in_won_once() {
        let pairs: Vec<(String, String)> = form_urlencoded::parse(encode(&sample()).as_bytes())
            .into_owned()
            .collect();
        let lookup = |key: &str| {
            pairs
                .iter()
                .find(|(candidate, _)| candidate == key)
                .map(|(_, value)| value.clone())
        };
        assert_eq!(lookup("deposit_min").as_deref(), Some("5000000"));
        assert_eq!(lookup("deposit_max").as_deref(), Some("100000000"));
        assert_eq!(lookup("rent_max").as_deref(), Some("500000"));
        assert_eq!(lookup("rent_min"), None);
        assert_eq!(lookup("sizes").as_deref(), Some("0.0,10.0|25.0,"));
    }

    #[test]
    fn blank_list_values_emit_no_keys() {
        let selection = FilterSelection {
            regions: vec![String::new()],
            house_types: vec![" ".to_string()],
            residents: vec![String::new(), "청년".to_string()],
            ..FilterSelection::default()
        };

        assert_eq!(encode(&selection), "residents=%EC%B2%AD%EB%85%84&page=1");
        let keys: Vec<&str> = api_query(&selection, 8).iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["page", "page_size", "residents"]);
    }

    #[test]
    fn amounts_beyond_won_range_are_dropped_both_ways() {
        let too_large = u64::MAX / WON_PER_MANWON + 1;
        let largest = u64::MAX / WON_PER_MANWON;
        let selection = FilterSelection {
            deposit_range: AmountRange::new(Some(largest), Some(too_large)),
            ..FilterSelection::default()
        };

        let encoded = encode(&selection);
        assert!(!encoded.contains("deposit_max"));
        assert_eq!(
            decode(&encoded).deposit_range,
            AmountRange::new(Some(largest), None)
        );
        assert!(api_query(&selection, 8)
            .iter()
            .all(|(key, _)| *key != "deposit_max"));

        let decoded = decode(&format!("deposit_max_man={too_large}"));
        assert_eq!(decoded.deposit_range, AmountRange::default());
    }

    #[test]
    fn decode_inverts_encode() {
        let selection = sample();
        assert_eq!(decode(&encode(&selection)), selection);
    }

    #[test]
    fn submission_resets_page() {
        let decoded = decode(&encode_submission(&sample()));
        assert_eq!(decoded.page, 1);
        assert_eq!(decoded.regions, sample().regions);
    }

    #[test]
    fn repeated_and_comma_regions_decode_alike() {
        let repeated = decode("region=서울&region=경기");
        let joined = decode("region=서울,경기");
        assert_eq!(repeated.regions, vec!["서울", "경기"]);
        assert_eq!(repeated, joined);
    }

    #[test]
    fn malformed_values_degrade_to_defaults() {
        let decoded = decode(
            "sizes=25.0|abc,def|10.0,15.0&deposit_min=lots&status=archived&ordering=size&page=0",
        );
        assert_eq!(decoded.size_bands, vec![SizeBand::new(10.0, Some(15.0))]);
        assert_eq!(decoded.deposit_range, AmountRange::default());
        assert_eq!(decoded.status, None);
        assert_eq!(decoded.sort, None);
        assert_eq!(decoded.page, 1);
    }

    #[test]
    fn blank_form_fields_are_absent() {
        let decoded = decode("?region=&deposit_min_man=&rent_max_man=40&page=");
        assert!(decoded.regions.is_empty());
        assert_eq!(decoded.deposit_range, AmountRange::default());
        assert_eq!(decoded.rent_range, AmountRange::new(None, Some(40)));
    }

    #[test]
    fn legacy_sort_keys_are_understood() {
        let decoded = decode("deposit=낮은순");
        assert_eq!(
            decoded.sort,
            Some(Sort::new(SortKey::Deposit, SortDirection::Ascending))
        );

        let decoded = decode("deposit=낮은순&ordering=-rent");
        assert_eq!(
            decoded.sort,
            Some(Sort::new(SortKey::Rent, SortDirection::Descending))
        );
    }

    #[test]
    fn api_spelling_decodes_size_pairs() {
        let decoded = decode("house_types=국민임대&size=0.0,10.0,25.0,");
        assert_eq!(decoded.house_types, vec!["국민임대"]);
        assert_eq!(
            decoded.size_bands,
            vec![SizeBand::new(0.0, Some(10.0)), SizeBand::new(25.0, None)]
        );
    }

    #[test]
    fn out_of_vocabulary_values_pass_through() {
        let decoded = decode("region=Atlantis&houseTypes=장기전세");
        assert_eq!(decoded.regions, vec!["Atlantis"]);
        assert_eq!(decoded.house_types, vec!["장기전세"]);
    }

    #[test]
    fn api_query_uses_upstream_keys() {
        let pairs = api_query(&sample(), 8);
        let expected: Vec<(&str, String)> = vec![
            ("page", "3".to_string()),
            ("page_size", "8".to_string()),
            ("region", "서울".to_string()),
            ("region", "경기".to_string()),
            ("house_types", "행복주택,공공임대".to_string()),
            ("size", "0.0,10.0,25.0,".to_string()),
            ("deposit_min", "5000000".to_string()),
            ("deposit_max", "100000000".to_string()),
            ("rent_max", "500000".to_string()),
            ("status", "ongoing".to_string()),
            ("residents", "청년,고령자(주거약자용)".to_string()),
            ("ordering", "-rent".to_string()),
        ];
        assert_eq!(pairs, expected);
    }
}
