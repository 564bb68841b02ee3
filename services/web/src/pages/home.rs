use super::layout::{escape, wrap};
use axum::response::Html;
use cheongyak::listings::catalog::{POPULAR_REGIONS, REGIONS};
use cheongyak::listings::{encode_submission, FilterSelection};

pub(crate) const UNSEARCHABLE_REGION: &str = "검색 불가능한 지역입니다.";

/// Landing page: region search plus shortcuts to the popular regions.
///
/// `notice` is shown above the form, e.g. after a search for a region the
/// catalog does not know.
pub(crate) fn home_page(query: &str, notice: Option<&str>) -> Html<String> {
    let notice = notice
        .map(|text| format!(r#"<div class="notice">{}</div>"#, escape(text)))
        .unwrap_or_default();

    let options: String = REGIONS
        .iter()
        .map(|region| format!(r#"<option value="{region}">"#))
        .collect();

    let shortcuts: String = POPULAR_REGIONS
        .iter()
        .map(|region| {
            let mut selection = FilterSelection::default();
            selection.toggle_region(region);
            format!(
                r#"<a class="chip" href="/listings?{}">{region}</a>"#,
                escape(&encode_submission(&selection))
            )
        })
        .collect();

    let body = format!(
        r#"<section class="hero">
        <h2>내게 맞는 공공임대 찾기</h2>
        <p class="meta">지역을 입력하면 모집 중인 임대주택 공고를 보여드립니다.</p>
        {notice}
        <form method="GET" action="/search" style="margin-top:1rem">
            <input type="text" name="q" list="regions" value="{query}" placeholder="지역명 (예: 서울, ㅅ)" autocomplete="off">
            <datalist id="regions">{options}</datalist>
            <button type="submit">검색</button>
        </form>
        <div class="chips">{shortcuts}</div>
        </section>"#,
        query = escape(query),
    );

    wrap("공공임대 모집공고", None, &body)
}
