use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;

use super::state::AppState;

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub async fn landing(State(state): State<AppState>) -> Html<String> {
    let path = escape_html(&state.options().telemetry_path);
    Html(format!(
        "<html>\n\
         <head><title>NIFCLOUD NAS Exporter</title></head>\n\
         <body>\n\
         <h1>NIFCLOUD NAS Exporter</h1>\n\
         <p><a href=\"{path}\">Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    ))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
