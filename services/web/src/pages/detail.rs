use super::layout::{escape, wrap};
use super::listings::status_badge;
use axum::response::Html;
use cheongyak::api::{ReceptionInfo, Schedule, UnitDetail};
use cheongyak::money::{format_manwon, format_pyeong_str};
use cheongyak::rent::{ContractBand, RentQuote};
use chrono::NaiveDate;
use url::form_urlencoded;

const UNDECIDED: &str = "미정";

/// Query parameters the detail page understands: which contract band tab is
/// open and where its deposit slider sits.
#[derive(Debug, Default, Clone)]
pub(crate) struct CalculatorState {
    pub(crate) group: Option<String>,
    pub(crate) slider: Option<i64>,
}

pub(crate) fn detail_page(
    unit_id: u64,
    detail: &UnitDetail,
    calculator: &CalculatorState,
    share_url: &str,
    today: NaiveDate,
) -> Html<String> {
    let badge = detail
        .schedule
        .as_ref()
        .and_then(|schedule| schedule.status_on(today))
        .map(status_badge)
        .unwrap_or_default();

    let body = format!(
        r#"<section class="section">{badge}
            <h1>{name}</h1>
            <p class="meta">{region} · {house_types}</p>
        </section>
        {info}
        {options}
        {schedule}
        {reception}
        <section class="section"><h2>공유하기</h2>
            <input type="text" readonly value="{share}" style="width:70%"> <a href="{share}">링크 열기</a>
        </section>"#,
        name = escape(&detail.complex_name),
        region = escape(&detail.region),
        house_types = escape(&detail.house_types),
        info = property_info(detail),
        options = rental_options(unit_id, &detail.contracts, calculator),
        schedule = schedule_section(detail.schedule.as_ref()),
        reception = reception_section(detail.reception_info.as_ref()),
        share = escape(share_url),
    );

    wrap(&detail.complex_name, Some(&detail.meta_description()), &body)
}

fn property_info(detail: &UnitDetail) -> String {
    let area = if detail.exclusive_area_m2.is_empty() {
        format_pyeong_str(&detail.exclusive_area_pyeong)
    } else {
        format!(
            "{}m² ({})",
            detail.exclusive_area_m2,
            format_pyeong_str(&detail.exclusive_area_pyeong)
        )
    };

    format!(
        r#"<section class="section"><h2>주택 정보</h2><table>
        <tr><th>입주 대상</th><td>{residents}</td></tr>
        <tr><th>전용면적</th><td>{area}</td></tr>
        <tr><th>기본 거주기간</th><td>{period}</td></tr>
        <tr><th>공급 호수</th><td>{supply}</td></tr>
        </table></section>"#,
        residents = escape(&detail.display_residents().join(", ")),
        area = escape(&area),
        period = or_undecided(&detail.default_residence_period),
        supply = or_undecided(&detail.current_supply),
    )
}

fn rental_options(unit_id: u64, bands: &[ContractBand], calculator: &CalculatorState) -> String {
    if bands.is_empty() {
        return r#"<section class="section"><h2>임대 조건</h2><p class="meta">임대 조건 정보가 없습니다.</p></section>"#
            .to_string();
    }

    let active = calculator
        .group
        .as_deref()
        .and_then(|group| bands.iter().position(|band| band.group == group))
        .unwrap_or(0);

    let tabs: String = bands
        .iter()
        .enumerate()
        .map(|(index, band)| {
            format!(
                r#"<a class="{class}" href="/listings/{unit_id}?group={group}">{label}</a>"#,
                class = if index == active { "active" } else { "" },
                group = form_urlencoded::byte_serialize(band.group.as_bytes()).collect::<String>(),
                label = escape(band_label(band)),
            )
        })
        .collect();

    let band = &bands[active];
    format!(
        r#"<section class="section"><h2>임대 조건</h2>
        <div class="tabs">{tabs}</div>
        <table>
        <tr><th>보증금</th><td>{deposit_range}</td></tr>
        <tr><th>월 임대료</th><td>{rent_range}</td></tr>
        <tr><th>계약금</th><td>{down_payment}</td></tr>
        </table>
        {calculator}
        </section>"#,
        deposit_range = manwon_span(band.deposit_min, band.deposit_max),
        rent_range = manwon_span(band.monthly_rent_min, band.monthly_rent_max),
        down_payment = if band.down_payment > 0.0 {
            format_manwon(band.down_payment)
        } else {
            UNDECIDED.to_string()
        },
        calculator = rent_calculator(unit_id, band, calculator.slider),
    )
}

fn rent_calculator(unit_id: u64, band: &ContractBand, position: Option<i64>) -> String {
    if !band.offers_conversion() {
        let quote = band.quote(band.deposit_min);
        return format!(
            r#"<div class="calculator fixed">
            <p>보증금 <strong>{}</strong> · 월 임대료 <strong>{}</strong></p>
            <p class="meta">이 조건은 보증금과 월 임대료를 전환할 수 없습니다.</p>
            </div>"#,
            format_manwon(quote.deposit()),
            format_manwon(quote.rent()),
        );
    }

    let slider = band.slider();
    let position = position
        .unwrap_or_else(|| slider.initial())
        .clamp(slider.min, slider.max);
    let quote = band.quote(slider.deposit_at(position));

    format!(
        r#"<form class="calculator" method="GET" action="/listings/{unit_id}">
        <input type="hidden" name="group" value="{group}">
        <input type="range" name="slider" min="{min}" max="{max}" step="1" value="{position}">
        <button type="submit">계산</button>
        {result}
        </form>"#,
        group = escape(&band.group),
        min = slider.min,
        max = slider.max,
        result = quote_summary(&quote),
    )
}

fn quote_summary(quote: &RentQuote) -> String {
    format!(
        r#"<p>보증금 <strong>{}</strong>을 내면 월 임대료는 <strong>{}</strong>입니다.</p>"#,
        format_manwon(quote.deposit()),
        format_manwon(quote.rent()),
    )
}

fn schedule_section(schedule: Option<&Schedule>) -> String {
    let schedule = schedule.cloned().unwrap_or_default();
    let period = match (
        schedule.application_period_start.as_deref(),
        schedule.application_period_end.as_deref(),
    ) {
        (None, None) => UNDECIDED.to_string(),
        (start, end) => format!(
            "{} ~ {}",
            or_undecided(start.unwrap_or_default()),
            or_undecided(end.unwrap_or_default())
        ),
    };

    format!(
        r#"<section class="section"><h2>모집 일정</h2><table>
        <tr><th>모집공고일</th><td>{announcement}</td></tr>
        <tr><th>접수기간</th><td>{period}</td></tr>
        <tr><th>당첨자 발표</th><td>{winners}</td></tr>
        </table></section>"#,
        announcement = or_undecided(schedule.announcement_date.as_deref().unwrap_or_default()),
        winners = or_undecided(schedule.winner_announcement_date.as_deref().unwrap_or_default()),
    )
}

fn reception_section(info: Option<&ReceptionInfo>) -> String {
    let info = info.cloned().unwrap_or_default();
    let hours = match (
        info.operating_period_start.as_deref(),
        info.operating_period_end.as_deref(),
    ) {
        (Some(start), Some(end)) => format!("{} ~ {}", escape(start), escape(end)),
        _ => UNDECIDED.to_string(),
    };

    format!(
        r#"<section class="section"><h2>접수처</h2><table>
        <tr><th>주소</th><td>{address}</td></tr>
        <tr><th>전화번호</th><td>{phone}</td></tr>
        <tr><th>운영기간</th><td>{hours}</td></tr>
        </table></section>"#,
        address = or_undecided(info.address.as_deref().unwrap_or_default()),
        phone = or_undecided(info.phone_number.as_deref().unwrap_or_default()),
    )
}

fn band_label(band: &ContractBand) -> &str {
    if band.group.trim().is_empty() {
        "기본"
    } else {
        &band.group
    }
}

fn manwon_span(min: f64, max: f64) -> String {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    if (high - low).abs() < f64::EPSILON {
        format_manwon(low)
    } else {
        format!("{} ~ {}", format_manwon(low), format_manwon(high))
    }
}

fn or_undecided(value: &str) -> String {
    if value.trim().is_empty() {
        UNDECIDED.to_string()
    } else {
        escape(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    fn detail() -> UnitDetail {
        serde_json::from_value(serde_json::json!({
            "complex_name": "서울가양 행복주택",
            "region": "서울 강서구",
            "house_types": "행복주택",
            "eligible_residents": ["청년", "기타", "기타"],
            "exclusive_area_m2": "26.94",
            "exclusive_area_pyeong": "8.15",
            "cotrancts": [
                { "group": "청년", "deposit_min": 2110, "deposit_max": 6330,
                  "monthly_rent_min": 8.4, "monthly_rent_max": 25.3, "down_payment": 211 },
                { "group": "고령자", "deposit_min": 1850, "deposit_max": 1850,
                  "monthly_rent_min": 19.6, "monthly_rent_max": 19.6 }
            ],
            "schedule": { "announcement_date": "2026-09-20", "application_period_start": "2026-10-01" },
            "reception_info": { "address": "서울 강서구 양천로 1", "phone_number": "1600-1004" }
        }))
        .expect("detail fixture")
    }

    fn render(calculator: CalculatorState) -> String {
        let Html(html) = detail_page(
            1,
            &detail(),
            &calculator,
            "https://www.cybs2025.co.kr/listings/1",
            today(),
        );
        html
    }

    #[test]
    fn first_band_opens_with_slider_at_lowest_deposit() {
        let html = render(CalculatorState::default());

        assert!(html.contains(r#"<a class="active" href="/listings/1?group=%EC%B2%AD%EB%85%84">청년</a>"#));
        assert!(html.contains(r#"name="slider" min="2110" max="6330" step="1" value="2110""#));
        assert!(html.contains("보증금 <strong>2110만원</strong>을 내면 월 임대료는 <strong>25.3만원</strong>"));
        assert!(html.contains("211만원"));
    }

    #[test]
    fn slider_position_is_clamped_into_band() {
        let html = render(CalculatorState {
            group: Some("청년".to_string()),
            slider: Some(99_999),
        });

        assert!(html.contains(r#"value="6330""#));
        assert!(html.contains("<strong>6330만원</strong>을 내면 월 임대료는 <strong>8.4만원</strong>"));
    }

    #[test]
    fn fixed_band_has_no_slider() {
        let html = render(CalculatorState {
            group: Some("고령자".to_string()),
            slider: Some(2000),
        });

        assert!(!html.contains(r#"type="range""#));
        assert!(html.contains("전환할 수 없습니다"));
        assert!(html.contains("<strong>1850만원</strong> · 월 임대료 <strong>19.6만원</strong>"));
    }

    #[test]
    fn missing_schedule_dates_read_as_undecided() {
        let html = render(CalculatorState::default());

        assert!(html.contains("<td>2026-10-01 ~ 미정</td>"));
        assert!(html.contains("<tr><th>당첨자 발표</th><td>미정</td></tr>"));
        assert!(html.contains("<tr><th>운영기간</th><td>미정</td></tr>"));
    }

    #[test]
    fn residents_and_meta_description() {
        let html = render(CalculatorState::default());

        assert!(html.contains("<td>청년, 공고 확인 필요</td>"));
        assert!(html.contains(r#"<meta name="description" content="서울가양 행복주택 임대모집공고 안내."#));
        assert!(html.contains(r#"value="https://www.cybs2025.co.kr/listings/1""#));
    }
}
