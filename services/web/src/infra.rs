use async_trait::async_trait;
use cheongyak::api::{
    FetchError, ReceptionInfo, Schedule, UnitDetail, UnitPage, UnitSource, UnitSummary,
};
use cheongyak::config::SiteConfig;
use cheongyak::listings::{AmountRange, FilterSelection, SortDirection, SortKey};
use cheongyak::money::WON_PER_MANWON;
use cheongyak::rent::ContractBand;
use chrono::{Local, NaiveDate};
use metrics_exporter_prometheus::PrometheusHandle;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// What the page handlers need: where listings come from and how to page
/// and link them.
#[derive(Clone)]
pub(crate) struct SiteState {
    pub(crate) units: Arc<dyn UnitSource>,
    pub(crate) page_size: u32,
    pub(crate) site: SiteConfig,
}

/// Bundled listings for `serve --sample-data`, filtered in memory the way the
/// units API filters them.
#[derive(Default, Clone)]
pub(crate) struct SampleUnitSource {
    units: Vec<UnitSummary>,
    details: HashMap<u64, UnitDetail>,
    as_of: Option<NaiveDate>,
}

impl SampleUnitSource {
    pub(crate) fn with_units(units: Vec<(UnitSummary, UnitDetail)>) -> Self {
        let mut source = Self::default();
        for (summary, detail) in units {
            source.details.insert(summary.id, detail);
            source.units.push(summary);
        }
        source
    }

    /// Pins the date used to evaluate the supply-status filter.
    #[cfg(test)]
    pub(crate) fn as_of(mut self, today: NaiveDate) -> Self {
        self.as_of = Some(today);
        self
    }

    pub(crate) fn seeded() -> Self {
        Self::with_units(vec![
            sample_unit(SampleSpec {
                id: 1,
                complex_name: "서울가양 행복주택",
                region: "서울 강서구",
                house_type: "행복주택",
                residents: &["대학생", "청년", "신혼부부"],
                pyeong: 8.2,
                area_m2: 26.94,
                contracts: &[("청년", 2_110.0, 6_330.0, 8.4, 25.3), ("신혼부부", 3_520.0, 8_800.0, 11.2, 31.5)],
                supply: ("2025-11-03", "2025-11-07"),
            }),
            sample_unit(SampleSpec {
                id: 2,
                complex_name: "수원당수 국민임대",
                region: "경기 수원시",
                house_type: "국민임대",
                residents: &["고령자", "고령자(주거약자용)", "기타"],
                pyeong: 14.7,
                area_m2: 48.6,
                contracts: &[("일반", 1_850.0, 1_850.0, 19.6, 19.6)],
                supply: ("2025-09-01", "2025-09-12"),
            }),
            sample_unit(SampleSpec {
                id: 3,
                complex_name: "부산명지 공공임대",
                region: "부산 강서구",
                house_type: "공공임대",
                residents: &["신혼부부", "한부모가족"],
                pyeong: 23.1,
                area_m2: 76.4,
                contracts: &[("일반", 4_200.0, 9_800.0, 22.0, 41.0)],
                supply: ("2026-12-01", "2026-12-10"),
            }),
            sample_unit(SampleSpec {
                id: 4,
                complex_name: "인천검단 행복주택",
                region: "인천 서구",
                house_type: "행복주택",
                residents: &["청년", "산업단지근로자"],
                pyeong: 11.3,
                area_m2: 37.4,
                contracts: &[("청년", 392.8, 1_200.0, 5.0, 20.0)],
                supply: ("2026-10-01", "2026-11-30"),
            }),
            sample_unit(SampleSpec {
                id: 5,
                complex_name: "대전도안 전세임대",
                region: "대전 유성구",
                house_type: "전세임대",
                residents: &["주거급여수급자"],
                pyeong: 27.5,
                area_m2: 90.9,
                contracts: &[("일반", 9_500.0, 9_500.0, 0.0, 0.0)],
                supply: ("2026-10-10", "2026-10-31"),
            }),
        ])
    }

    fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[async_trait]
impl UnitSource for SampleUnitSource {
    async fn fetch_units(
        &self,
        selection: &FilterSelection,
        page_size: u32,
    ) -> Result<UnitPage, FetchError> {
        let today = self.today();
        let mut matched: Vec<UnitSummary> = self
            .units
            .iter()
            .filter(|unit| matches_selection(unit, selection, today))
            .cloned()
            .collect();

        if let Some(sort) = selection.sort {
            matched.sort_by(|a, b| {
                let ordering = match sort.key {
                    SortKey::Deposit => a.deposit_min.total_cmp(&b.deposit_min),
                    SortKey::Rent => a.rent_min.total_cmp(&b.rent_min),
                };
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let total_count = matched.len() as u64;
        let page_size = page_size.max(1) as usize;
        let skip = (selection.page.max(1) as usize - 1) * page_size;
        let units = matched.into_iter().skip(skip).take(page_size).collect();

        Ok(UnitPage { units, total_count })
    }

    async fn fetch_unit(&self, unit_id: u64) -> Result<UnitDetail, FetchError> {
        self.details
            .get(&unit_id)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                resource: format!("unit {unit_id}"),
                status: 404,
            })
    }
}

fn matches_selection(unit: &UnitSummary, selection: &FilterSelection, today: NaiveDate) -> bool {
    let region_match = selection.regions.is_empty()
        || selection
            .regions
            .iter()
            .any(|region| unit.region.starts_with(region.as_str()));
    let type_match = selection.house_types.is_empty()
        || selection
            .house_types
            .iter()
            .any(|house_type| unit.house_types.contains(house_type.as_str()));
    let size_match = selection.size_bands.is_empty()
        || unit
            .exclusive_area_pyeong
            .trim()
            .parse::<f64>()
            .map(|pyeong| selection.size_bands.iter().any(|band| band.contains(pyeong)))
            .unwrap_or(false);
    let resident_match = selection.residents.is_empty()
        || selection
            .residents
            .iter()
            .any(|resident| unit.eligible_residents.contains(resident));
    let status_match = selection
        .status
        .map(|status| unit.supply_status(today) == Some(status))
        .unwrap_or(true);

    region_match
        && type_match
        && size_match
        && resident_match
        && status_match
        && overlaps(&selection.deposit_range, unit.deposit_min, unit.deposit_max)
        && overlaps(&selection.rent_range, unit.rent_min, unit.rent_max)
}

/// Whether a unit's `[low, high]` 원 span meets a 만원 filter range.
fn overlaps(range: &AmountRange, low: f64, high: f64) -> bool {
    let to_won = |manwon: u64| (manwon * WON_PER_MANWON) as f64;
    let above_min = range
        .min
        .map(|min| high.partial_cmp(&to_won(min)) != Some(Ordering::Less))
        .unwrap_or(true);
    let below_max = range
        .max
        .map(|max| low.partial_cmp(&to_won(max)) != Some(Ordering::Greater))
        .unwrap_or(true);
    above_min && below_max
}

struct SampleSpec {
    id: u64,
    complex_name: &'static str,
    region: &'static str,
    house_type: &'static str,
    residents: &'static [&'static str],
    pyeong: f64,
    area_m2: f64,
    /// `(group, deposit_min, deposit_max, rent_min, rent_max)` in 만원.
    contracts: &'static [(&'static str, f64, f64, f64, f64)],
    supply: (&'static str, &'static str),
}

fn sample_unit(sample: SampleSpec) -> (UnitSummary, UnitDetail) {
    let contracts: Vec<ContractBand> = sample
        .contracts
        .iter()
        .map(|(group, deposit_min, deposit_max, rent_min, rent_max)| ContractBand {
            group: group.to_string(),
            deposit_min: *deposit_min,
            deposit_max: *deposit_max,
            monthly_rent_min: *rent_min,
            monthly_rent_max: *rent_max,
            down_payment: (deposit_min * 0.1).round(),
        })
        .collect();

    let won = |manwon: f64| manwon * WON_PER_MANWON as f64;
    let bounds = |pick: fn(&ContractBand) -> f64| {
        contracts
            .iter()
            .map(pick)
            .fold(None, |acc: Option<(f64, f64)>, value| match acc {
                Some((low, high)) => Some((low.min(value), high.max(value))),
                None => Some((value, value)),
            })
            .unwrap_or((0.0, 0.0))
    };
    let (deposit_min, _) = bounds(|band| band.deposit_min);
    let (_, deposit_max) = bounds(|band| band.deposit_max);
    let (rent_min, _) = bounds(|band| band.monthly_rent_min);
    let (_, rent_max) = bounds(|band| band.monthly_rent_max);

    let residents: Vec<String> = sample.residents.iter().map(|r| r.to_string()).collect();
    let (start, end) = sample.supply;

    let summary = UnitSummary {
        id: sample.id,
        images: String::new(),
        complex_name: sample.complex_name.to_string(),
        unit_type: format!("{:.0}A", sample.area_m2),
        region: sample.region.to_string(),
        house_types: sample.house_type.to_string(),
        eligible_residents: residents.clone(),
        exclusive_area_m2: format!("{:.2}", sample.area_m2),
        exclusive_area_pyeong: format!("{:.2}", sample.pyeong),
        deposit_min: won(deposit_min),
        deposit_max: won(deposit_max),
        rent_min: won(rent_min),
        rent_max: won(rent_max),
        general_supply_date_start: Some(start.to_string()),
        general_supply_date_end: Some(end.to_string()),
    };

    let detail = UnitDetail {
        id: Some(sample.id),
        complex_name: summary.complex_name.clone(),
        region: summary.region.clone(),
        house_types: summary.house_types.clone(),
        eligible_residents: residents,
        exclusive_area_m2: summary.exclusive_area_m2.clone(),
        exclusive_area_pyeong: summary.exclusive_area_pyeong.clone(),
        default_residence_period: "6".to_string(),
        current_supply: "120".to_string(),
        contracts,
        schedule: Some(Schedule {
            announcement_date: Some(start.to_string()),
            application_period_start: Some(start.to_string()),
            application_period_end: Some(end.to_string()),
            winner_announcement_date: None,
        }),
        reception_info: Some(ReceptionInfo {
            address: Some(format!("{} 주택홍보관", sample.region)),
            phone_number: Some("1600-1004".to_string()),
            operating_period_start: Some(start.to_string()),
            operating_period_end: None,
        }),
    };

    (summary, detail)
}
