use serde::Serialize;

/// Half-open floor-area range `[min, max)` in 평. `max` is `None` for the
/// open-ended top band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeBand {
    pub min: f64,
    pub max: Option<f64>,
}

impl SizeBand {
    pub const fn new(min: f64, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// `"10.0,15.0"`, or `"25.0,"` when unbounded. Bounds are written with
    /// the shortest text that parses back to the same `f64`.
    pub fn token(&self) -> String {
        match self.max {
            Some(max) => format!("{:?},{:?}", self.min, max),
            None => format!("{:?},", self.min),
        }
    }

    /// Parses a `"min,max"` token; anything without the separator or with a
    /// non-numeric bound is rejected.
    pub fn parse_token(token: &str) -> Option<Self> {
        let (min, max) = token.trim().split_once(',')?;
        let min = parse_finite(min)?;
        let max = match max.trim() {
            "" => None,
            raw => Some(parse_finite(raw)?),
        };
        Some(Self { min, max })
    }

    pub fn contains(&self, pyeong: f64) -> bool {
        pyeong >= self.min && self.max.map_or(true, |max| pyeong < max)
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Inclusive amount bounds in 만원, as the slider controls express them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AmountRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl AmountRange {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Planned,
    Ongoing,
    Closed,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [Self::Planned, Self::Ongoing, Self::Closed];

    pub fn as_param(&self) -> &'static str {
        match self {
            ListingStatus::Planned => "planned",
            ListingStatus::Ongoing => "ongoing",
            ListingStatus::Closed => "closed",
        }
    }

    pub fn from_param(raw: &str) -> Option<Self> {
        match raw.trim() {
            "planned" => Some(Self::Planned),
            "ongoing" => Some(Self::Ongoing),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListingStatus::Planned => "공고예정",
            ListingStatus::Ongoing => "접수중",
            ListingStatus::Closed => "접수마감",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Deposit,
    Rent,
}

impl SortKey {
    pub fn field(&self) -> &'static str {
        match self {
            SortKey::Deposit => "deposit",
            SortKey::Rent => "rent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Deposit => "보증금",
            SortKey::Rent => "월세",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "낮은순",
            SortDirection::Descending => "높은순",
        }
    }

    pub(crate) fn from_label(raw: &str) -> Option<Self> {
        match raw.trim() {
            "낮은순" => Some(Self::Ascending),
            "높은순" => Some(Self::Descending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// DRF-style `ordering` value: `deposit`, `-deposit`, `rent`, `-rent`.
    pub fn ordering(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.key.field().to_string(),
            SortDirection::Descending => format!("-{}", self.key.field()),
        }
    }

    pub fn from_ordering(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (direction, field) = match raw.strip_prefix('-') {
            Some(field) => (SortDirection::Descending, field),
            None => (SortDirection::Ascending, raw),
        };
        let key = match field {
            "deposit" => SortKey::Deposit,
            "rent" => SortKey::Rent,
            _ => return None,
        };
        Some(Self { key, direction })
    }
}

/// Everything the listing filter form can express.
///
/// Multi-valued fields behave as sets that remember insertion order. Every
/// filter mutation sends the user back to the first page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub regions: Vec<String>,
    pub house_types: Vec<String>,
    pub size_bands: Vec<SizeBand>,
    pub deposit_range: AmountRange,
    pub rent_range: AmountRange,
    pub residents: Vec<String>,
    pub status: Option<ListingStatus>,
    pub sort: Option<Sort>,
    pub page: u32,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            house_types: Vec::new(),
            size_bands: Vec::new(),
            deposit_range: AmountRange::default(),
            rent_range: AmountRange::default(),
            residents: Vec::new(),
            status: None,
            sort: None,
            page: 1,
        }
    }
}

impl FilterSelection {
    pub fn toggle_region(&mut self, region: &str) {
        toggle_value(&mut self.regions, region.to_string());
        self.page = 1;
    }

    pub fn toggle_house_type(&mut self, house_type: &str) {
        toggle_value(&mut self.house_types, house_type.to_string());
        self.page = 1;
    }

    pub fn toggle_size_band(&mut self, band: SizeBand) {
        toggle_value(&mut self.size_bands, band);
        self.page = 1;
    }

    pub fn toggle_resident(&mut self, resident: &str) {
        toggle_value(&mut self.residents, resident.to_string());
        self.page = 1;
    }

    pub fn set_status(&mut self, status: Option<ListingStatus>) {
        self.status = status;
        self.page = 1;
    }

    pub fn set_deposit_range(&mut self, range: AmountRange) {
        self.deposit_range = range;
        self.page = 1;
    }

    pub fn set_rent_range(&mut self, range: AmountRange) {
        self.rent_range = range;
        self.page = 1;
    }

    /// Selecting the active sort a second time clears it; anything else
    /// replaces it.
    pub fn toggle_sort(&mut self, key: SortKey, direction: SortDirection) {
        let requested = Sort::new(key, direction);
        self.sort = if self.sort == Some(requested) {
            None
        } else {
            Some(requested)
        };
        self.page = 1;
    }

    pub fn with_sort_toggled(&self, key: SortKey, direction: SortDirection) -> Self {
        let mut next = self.clone();
        next.toggle_sort(key, direction);
        next
    }

    /// Page-only navigation: filters stay as they are.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.regions.is_empty()
            && self.house_types.is_empty()
            && self.size_bands.is_empty()
            && self.deposit_range.is_unbounded()
            && self.rent_range.is_unbounded()
            && self.residents.is_empty()
            && self.status.is_none()
            && self.sort.is_none()
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.regions.iter().any(|value| value == region)
    }

    pub fn has_house_type(&self, house_type: &str) -> bool {
        self.house_types.iter().any(|value| value == house_type)
    }

    pub fn has_size_band(&self, band: &SizeBand) -> bool {
        self.size_bands.contains(band)
    }

    pub fn has_resident(&self, resident: &str) -> bool {
        self.residents.iter().any(|value| value == resident)
    }
}

fn toggle_value<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if let Some(index) = values.iter().position(|existing| *existing == value) {
        values.remove(index);
    } else {
        values.push(value);
    }
}

/// Appends `value` unless already present.
pub(crate) fn insert_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}
