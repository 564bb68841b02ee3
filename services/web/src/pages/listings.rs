use super::layout::{checked, escape, wrap};
use axum::response::Html;
use cheongyak::api::{UnitPage, UnitSummary};
use cheongyak::listings::catalog::{
    filter_regions, resident_catalog, size_preset_for, HOUSE_TYPES, SIZE_PRESETS,
};
use cheongyak::listings::{
    encode, encode_submission, AmountRange, FilterSelection, ListingStatus, SizeBand, Sort,
    SortDirection, SortKey,
};
use cheongyak::money::{format_pyeong, format_pyeong_str, format_won};
use chrono::NaiveDate;

/// Page links shown on each side of the current page.
const PAGE_WINDOW: u32 = 2;

const SORT_LINKS: [(SortKey, SortDirection); 4] = [
    (SortKey::Deposit, SortDirection::Ascending),
    (SortKey::Deposit, SortDirection::Descending),
    (SortKey::Rent, SortDirection::Ascending),
    (SortKey::Rent, SortDirection::Descending),
];

pub(crate) fn listings_page(
    selection: &FilterSelection,
    page: &UnitPage,
    page_size: u32,
    today: NaiveDate,
) -> Html<String> {
    let cards = if page.units.is_empty() {
        r#"<p class="notice">조건에 맞는 공고가 없습니다.</p>"#.to_string()
    } else {
        let cards: String = page.units.iter().map(|unit| unit_card(unit, today)).collect();
        format!(r#"<div class="grid">{cards}</div>"#)
    };

    let body = format!(
        r#"{form}
        <div class="sorts">{sorts}</div>
        <p class="meta">총 {total}건</p>
        {cards}
        {pagination}"#,
        form = filter_form(selection),
        sorts = sort_links(selection),
        total = page.total_count,
        pagination = pagination(selection, page.total_pages(page_size)),
    );

    wrap("임대 공고 검색", None, &body)
}

/// The filter panel. It submits to `/listings/search`, which canonicalises
/// the query and redirects back to page 1.
fn filter_form(selection: &FilterSelection) -> String {
    let regions = checkbox_group(
        "region",
        &with_extras(filter_regions().map(str::to_string), &selection.regions),
        |region| selection.has_region(region),
    );
    let house_types = checkbox_group(
        "houseTypes",
        &with_extras(
            HOUSE_TYPES.iter().map(|house_type| house_type.to_string()),
            &selection.house_types,
        ),
        |house_type| selection.has_house_type(house_type),
    );
    let residents = checkbox_group(
        "residents",
        &with_extras(resident_catalog().into_iter(), &selection.residents),
        |resident| selection.has_resident(resident),
    );

    let presets = SIZE_PRESETS
        .iter()
        .map(|preset| (preset.band, preset.label.to_string()));
    let custom = selection
        .size_bands
        .iter()
        .filter(|band| size_preset_for(band).is_none())
        .map(|band| (*band, size_band_label(band)));
    let sizes: String = presets
        .chain(custom)
        .map(|(band, label)| {
            format!(
                r#"<label><input type="checkbox" name="sizes" value="{token}"{on}> {label}</label>"#,
                token = band.token(),
                on = checked(selection.has_size_band(&band)),
                label = escape(&label),
            )
        })
        .collect();

    let statuses: String = ListingStatus::ALL
        .iter()
        .map(|status| {
            let selected = if selection.status == Some(*status) {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                status.as_param(),
                status.label()
            )
        })
        .collect();

    let ordering = selection
        .sort
        .map(|sort| {
            format!(
                r#"<input type="hidden" name="ordering" value="{}">"#,
                sort.ordering()
            )
        })
        .unwrap_or_default();

    format!(
        r#"<form class="filters" method="GET" action="/listings/search">
        <fieldset><legend>지역</legend>{regions}</fieldset>
        <fieldset><legend>주택 유형</legend>{house_types}</fieldset>
        <fieldset><legend>전용면적</legend>{sizes}</fieldset>
        <fieldset class="amounts"><legend>보증금 (만원)</legend>{deposit}</fieldset>
        <fieldset class="amounts"><legend>월 임대료 (만원)</legend>{rent}</fieldset>
        <fieldset><legend>입주 대상</legend>{residents}</fieldset>
        <fieldset><legend>모집 상태</legend><select name="status"><option value="">전체</option>{statuses}</select></fieldset>
        {ordering}
        <button type="submit">적용</button> <a href="/listings">초기화</a>
        </form>"#,
        deposit = amount_inputs("deposit", &selection.deposit_range),
        rent = amount_inputs("rent", &selection.rent_range),
    )
}

/// Catalog values first, then any selected values the catalog lacks so they
/// stay visible and can be unticked.
fn with_extras(catalog: impl Iterator<Item = String>, selected: &[String]) -> Vec<String> {
    let mut values: Vec<String> = catalog.collect();
    for value in selected {
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    values
}

fn size_band_label(band: &SizeBand) -> String {
    match band.max {
        Some(max) => format!("{}~{}", format_pyeong(band.min), format_pyeong(max)),
        None => format!("{} 이상", format_pyeong(band.min)),
    }
}

fn checkbox_group(name: &str, values: &[String], is_on: impl Fn(&str) -> bool) -> String {
    values
        .iter()
        .map(|value| {
            format!(
                r#"<label><input type="checkbox" name="{name}" value="{value}"{on}> {value}</label>"#,
                on = checked(is_on(value)),
                value = escape(value),
            )
        })
        .collect()
}

fn amount_inputs(field: &str, range: &AmountRange) -> String {
    let value = |bound: Option<u64>| bound.map(|amount| amount.to_string()).unwrap_or_default();
    format!(
        r#"<input type="number" min="0" name="{field}_min_man" value="{min}" placeholder="최소"> ~
        <input type="number" min="0" name="{field}_max_man" value="{max}" placeholder="최대">"#,
        min = value(range.min),
        max = value(range.max),
    )
}

fn sort_links(selection: &FilterSelection) -> String {
    SORT_LINKS
        .iter()
        .map(|(key, direction)| {
            let active = selection.sort == Some(Sort::new(*key, *direction));
            let target = selection.with_sort_toggled(*key, *direction);
            format!(
                r#"<a class="{class}" href="/listings?{query}">{key} {direction}</a>"#,
                class = if active { "active" } else { "" },
                query = escape(&encode_submission(&target)),
                key = key.label(),
                direction = direction.label(),
            )
        })
        .collect()
}

fn unit_card(unit: &UnitSummary, today: NaiveDate) -> String {
    let thumbnail = unit
        .thumbnail()
        .map(|src| format!(r#"<img src="{}" alt="" loading="lazy">"#, escape(src)))
        .unwrap_or_default();
    let badge = unit
        .supply_status(today)
        .map(status_badge)
        .unwrap_or_default();

    format!(
        r#"<a class="card" href="/listings/{id}">{thumbnail}
        <div class="card-body">{badge}
            <h3>{name}</h3>
            <div class="meta">{region} · {house_types} {unit_type}</div>
            <div class="meta">전용 {area} · {residents}</div>
            <div>보증금 {deposit}</div>
            <div>월 임대료 {rent}</div>
        </div></a>"#,
        id = unit.id,
        name = escape(&unit.complex_name),
        region = escape(&unit.region),
        house_types = escape(&unit.house_types),
        unit_type = escape(&unit.unit_type),
        area = escape(&format_pyeong_str(&unit.exclusive_area_pyeong)),
        residents = escape(&unit.eligible_residents.join(", ")),
        deposit = amount_span(unit.deposit_min, unit.deposit_max),
        rent = amount_span(unit.rent_min, unit.rent_max),
    )
}

fn amount_span(min: f64, max: f64) -> String {
    if (max - min).abs() < 1.0 {
        format_won(min)
    } else {
        format!("{} ~ {}", format_won(min), format_won(max))
    }
}

pub(crate) fn status_badge(status: ListingStatus) -> String {
    let class = match status {
        ListingStatus::Planned => "badge-planned",
        ListingStatus::Ongoing => "badge-ongoing",
        ListingStatus::Closed => "badge-closed",
    };
    format!(r#"<span class="badge {class}">{}</span>"#, status.label())
}

/// First and last page plus a window around the current one, with gaps
/// marked by an ellipsis.
fn pagination(selection: &FilterSelection, total_pages: u32) -> String {
    if total_pages <= 1 {
        return String::new();
    }

    let current = selection.page.clamp(1, total_pages);
    let start = current.saturating_sub(PAGE_WINDOW).max(1);
    let end = current.saturating_add(PAGE_WINDOW).min(total_pages);

    let link = |number: u32| {
        let class = if number == selection.page {
            "current"
        } else {
            ""
        };
        format!(
            r#"<a class="{class}" href="/listings?{}">{number}</a>"#,
            escape(&encode(&selection.with_page(number)))
        )
    };
    let gap = r#"<span class="gap">…</span>"#;

    let mut links = String::new();
    if start > 1 {
        links.push_str(&link(1));
        if start > 2 {
            links.push_str(gap);
        }
    }
    for number in start..=end {
        links.push_str(&link(number));
    }
    if end < total_pages {
        if end + 1 < total_pages {
            links.push_str(gap);
        }
        links.push_str(&link(total_pages));
    }

    format!(r#"<nav class="pages">{links}</nav>"#)
}
