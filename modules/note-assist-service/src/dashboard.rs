//! Dashboard HTML page handler.
//!
//! Serves a self-contained status page: provider mode, model and uptime.

use crate::routes::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use note_assist_types::ProviderMode;
use std::sync::Arc;

pub async fn dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime_str = format_uptime(state.start_time.elapsed().as_secs());
    let mode = state.assist.mode();
    let model = escape_html(state.assist.model().unwrap_or("-"));
    let mode_note = match mode {
        ProviderMode::Anthropic => "Prompts are forwarded to the Anthropic messages API.",
        ProviderMode::Demo => "No ANTHROPIC_API_KEY set; canned demo responses are served.",
    };
    let rendered_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Note Assist</title>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0f1117; color: #e0e0e0; padding: 20px; }}
  h1 {{ color: #a371f7; margin-bottom: 8px; }}
  .meta {{ color: #8b949e; font-size: 0.85em; margin-bottom: 20px; }}
  .stats {{ display: flex; gap: 16px; margin-bottom: 24px; flex-wrap: wrap; }}
  .stat {{ background: #161b22; border: 1px solid #30363d; border-radius: 8px; padding: 16px 24px; text-align: center; min-width: 120px; }}
  .stat .val {{ display: block; font-size: 1.4em; font-weight: bold; color: #a371f7; }}
  .stat .lbl {{ display: block; font-size: 0.85em; color: #8b949e; margin-top: 4px; }}
  .mono {{ font-family: 'SF Mono', 'Consolas', monospace; font-size: 0.85em; }}
</style>
</head>
<body>
  <h1>Note Assist</h1>
  <p class="meta">Uptime: {uptime_str} &middot; Rendered: {rendered_at}</p>
  <div class="stats">
    <div class="stat"><span class="val">{mode}</span><span class="lbl">Provider</span></div>
    <div class="stat"><span class="val mono">{model}</span><span class="lbl">Model</span></div>
  </div>
  <p>{mode_note}</p>
  <p class="meta">Endpoints: <span class="mono">POST /api/ai</span> &middot; <span class="mono">GET /api/status</span></p>
</body>
</html>"#,
    );

    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html)
}

// Model name comes from the environment
fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(5), "5s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3725), "1h 2m 5s");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>a&b</script>"),
            "&lt;script&gt;a&amp;b&lt;/script&gt;"
        );
        assert_eq!(escape_html("claude-3-5-sonnet-20241022"), "claude-3-5-sonnet-20241022");
    }
}
