use axum::http::StatusCode;
use axum::response::Html;

const SITE_NAME: &str = "청약백서";

const CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{background:#f7f8fa;color:#1f2328;font-family:'Pretendard','Apple SD Gothic Neo',system-ui,sans-serif}
a{color:#2f6fed;text-decoration:none}a:hover{text-decoration:underline}
.nav{background:#fff;border-bottom:1px solid #e3e6ea;padding:0.75rem 2rem;display:flex;align-items:center;gap:2rem}
.nav h1{font-size:1.15rem}.nav a{color:#57606a}
.container{max-width:1100px;margin:0 auto;padding:1.5rem}
.hero{background:#fff;border:1px solid #e3e6ea;border-radius:12px;padding:2.5rem;text-align:center;margin-bottom:1.5rem}
.hero h2{font-size:1.8rem;margin-bottom:0.5rem}
.notice{background:#fff4e5;border:1px solid #f5c26b;color:#8a5300;padding:0.75rem 1rem;border-radius:8px;margin:1rem 0}
.chips{display:flex;gap:0.5rem;flex-wrap:wrap;justify-content:center;margin-top:1rem}
.chip{background:#eef2ff;color:#2f6fed;padding:4px 12px;border-radius:999px;font-size:0.9rem}
.filters{background:#fff;border:1px solid #e3e6ea;border-radius:8px;padding:1rem;margin-bottom:1rem}
.filters fieldset{border:none;margin-bottom:0.75rem}.filters legend{font-weight:600;margin-bottom:0.25rem}
.filters label{display:inline-block;margin:0 0.75rem 0.25rem 0;font-size:0.9rem}
.amounts input{width:110px}
.sorts{display:flex;gap:0.75rem;margin:0.75rem 0}.sorts a.active{font-weight:700;color:#1f2328}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(300px,1fr));gap:1rem}
.card{background:#fff;border:1px solid #e3e6ea;border-radius:8px;overflow:hidden;display:block;color:inherit}
.card img{width:100%;height:160px;object-fit:cover}
.card-body{padding:1rem}.card-body h3{margin:0.25rem 0}
.meta{color:#57606a;font-size:0.9rem}
.badge{display:inline-block;padding:2px 8px;border-radius:4px;font-size:0.75rem;font-weight:600;background:#e3e6ea}
.badge-planned{background:#eef2ff;color:#2f6fed}.badge-ongoing{background:#dafbe1;color:#1a7f37}.badge-closed{background:#ffebe9;color:#cf222e}
.pages{display:flex;gap:0.5rem;justify-content:center;margin:1.5rem 0}.pages .current{font-weight:700;text-decoration:underline}.pages .gap{color:#888}
.section{background:#fff;border:1px solid #e3e6ea;border-radius:8px;padding:1.25rem;margin-bottom:1rem}
.section h2{font-size:1.1rem;margin-bottom:0.75rem}
.tabs{display:flex;gap:0.5rem;margin-bottom:0.75rem}.tabs a.active{font-weight:700;border-bottom:2px solid #2f6fed}
table{width:100%;border-collapse:collapse}th,td{padding:0.5rem;text-align:left;border-bottom:1px solid #eaeef2}
th{color:#57606a;font-weight:600;width:30%}
input,select,button{font-size:0.9rem;padding:0.35rem 0.5rem;border:1px solid #d0d7de;border-radius:6px}
button{background:#2f6fed;color:#fff;border:none;cursor:pointer}
"#;

/// Wraps a page body in the site chrome.
pub(crate) fn wrap(title: &str, description: Option<&str>, body: &str) -> Html<String> {
    let description = description
        .map(|text| format!(r#"<meta name="description" content="{}">"#, escape(text)))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html><html lang="ko"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
        <title>{title} | {SITE_NAME}</title>{description}<style>{CSS}</style></head>
        <body><nav class="nav"><h1><a href="/">{SITE_NAME}</a></h1><a href="/listings">임대 공고</a></nav>
        <main class="container">{body}</main></body></html>"#,
        title = escape(title),
    ))
}

/// Shown instead of a page when the units API could not answer.
pub(crate) fn failure_page(status: StatusCode) -> Html<String> {
    let message = if status == StatusCode::NOT_FOUND {
        "요청하신 공고를 찾을 수 없습니다."
    } else {
        "공고 정보를 불러오지 못했습니다. 잠시 후 다시 시도해 주세요."
    };
    let body = format!(
        r#"<div class="hero"><h2>{message}</h2><p><a href="/listings">공고 목록으로 돌아가기</a></p></div>"#
    );
    wrap("오류", None, &body)
}

pub(crate) fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub(crate) fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}
