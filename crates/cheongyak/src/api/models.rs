use crate::listings::ListingStatus;
use crate::rent::ContractBand;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One card on the listing page. Amounts are in 원.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub images: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub complex_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub region: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub house_types: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub eligible_residents: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub exclusive_area_m2: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub exclusive_area_pyeong: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub deposit_min: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub deposit_max: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rent_min: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rent_max: f64,
    #[serde(default)]
    pub general_supply_date_start: Option<String>,
    #[serde(default)]
    pub general_supply_date_end: Option<String>,
}

impl UnitSummary {
    /// First image when the API sends a comma-separated list.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images
            .split(',')
            .map(str::trim)
            .find(|image| !image.is_empty())
    }

    pub fn supply_status(&self, today: NaiveDate) -> Option<ListingStatus> {
        status_for_window(
            self.general_supply_date_start.as_deref(),
            self.general_supply_date_end.as_deref(),
            today,
        )
    }
}

/// A page of units plus the total across all pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitPage {
    pub units: Vec<UnitSummary>,
    pub total_count: u64,
}

impl UnitPage {
    pub fn total_pages(&self, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        let pages = self.total_count.div_ceil(u64::from(page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

/// Either the paginated envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Paginated<T> {
    Envelope {
        #[serde(default)]
        count: Option<u64>,
        results: Vec<T>,
    },
    Bare(Vec<T>),
}

impl Paginated<UnitSummary> {
    pub(crate) fn into_page(self) -> UnitPage {
        match self {
            Paginated::Envelope { count, results } => UnitPage {
                total_count: count.unwrap_or(results.len() as u64),
                units: results,
            },
            Paginated::Bare(results) => UnitPage {
                total_count: results.len() as u64,
                units: results,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDetail {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub complex_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub region: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub house_types: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub eligible_residents: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub exclusive_area_m2: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub exclusive_area_pyeong: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub default_residence_period: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub current_supply: String,
    #[serde(default, alias = "cotrancts")]
    pub contracts: Vec<ContractBand>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub reception_info: Option<ReceptionInfo>,
}

impl UnitDetail {
    /// Residents for display: `기타` reads as `공고 확인 필요`, duplicates
    /// collapse.
    pub fn display_residents(&self) -> Vec<String> {
        let mut residents: Vec<String> = Vec::new();
        for resident in &self.eligible_residents {
            let label = if resident == "기타" {
                "공고 확인 필요".to_string()
            } else {
                resident.clone()
            };
            if !residents.contains(&label) {
                residents.push(label);
            }
        }
        residents
    }

    pub fn meta_description(&self) -> String {
        let office = self
            .reception_info
            .as_ref()
            .and_then(|info| info.address.as_deref())
            .unwrap_or("접수처 정보 없음");
        format!(
            "{} 임대모집공고 안내. 입주대상자: {}, 전용면적: {}m², 접수처: {}, 위치: {}.",
            self.complex_name,
            self.eligible_residents.join(", "),
            self.exclusive_area_m2,
            office,
            self.region
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub announcement_date: Option<String>,
    #[serde(default, alias = "general_supply_date_start")]
    pub application_period_start: Option<String>,
    #[serde(default, alias = "general_supply_date_end")]
    pub application_period_end: Option<String>,
    #[serde(default)]
    pub winner_announcement_date: Option<String>,
}

impl Schedule {
    pub fn status_on(&self, today: NaiveDate) -> Option<ListingStatus> {
        status_for_window(
            self.application_period_start.as_deref(),
            self.application_period_end.as_deref(),
            today,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceptionInfo {
    #[serde(default, alias = "officeAddress")]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub operating_period_start: Option<String>,
    #[serde(default)]
    pub operating_period_end: Option<String>,
}

fn status_for_window(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Option<ListingStatus> {
    let start = start.and_then(parse_date);
    let end = end.and_then(parse_date);

    match (start, end) {
        (Some(start), _) if today < start => Some(ListingStatus::Planned),
        (_, Some(end)) if today > end => Some(ListingStatus::Closed),
        (Some(_), Some(_)) => Some(ListingStatus::Ongoing),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) => value,
        Some(Value::Number(value)) => value.to_string(),
        Some(Value::Bool(value)) => value.to_string(),
        _ => String::new(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(value)) => value.as_f64().unwrap_or_default(),
        Some(Value::String(value)) => value.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

/// Residents arrive as an array, a comma string, or null.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::String(value) => Some(value),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(value)) => value
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}
