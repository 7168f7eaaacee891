// src/web/status.rs
// Connection status page: which configured PLCs hold a live session

use crate::config::{self, PlcEndpoint};
use crate::web::AppState;
use axum::extract::State;
use axum::response::Html;
use std::time::Duration;

pub async fn page(State(state): State<AppState>) -> Html<String> {
    let plcs = config::available_plcs();

    let mut connected = Vec::new();
    let mut disconnected = Vec::new();
    for plc in &plcs {
        let authenticated = state
            .store
            .get(&plc.plc_ip_address)
            .await
            .is_some_and(|entry| !entry.token.is_empty());
        if authenticated {
            connected.push(label(plc));
        } else {
            disconnected.push(label(plc));
        }
    }

    Html(render(&connected, &disconnected, state.started.elapsed()))
}

fn label(plc: &PlcEndpoint) -> String {
    format!("{} ({})", plc.plc_name, plc.plc_ip_address)
}

fn list(items: &[String], class: &str, empty: &str) -> String {
    if items.is_empty() {
        return format!("<p class=\"empty\">{empty}</p>");
    }
    let entries: Vec<String> = items
        .iter()
        .map(|item| format!("<li class=\"{class}\">{item}</li>"))
        .collect();
    format!("<ul>{}</ul>", entries.join(""))
}

fn render(connected: &[String], disconnected: &[String], uptime: Duration) -> String {
    let total = connected.len() + disconnected.len();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>S7 Bridge Status</title>
<style>
body {{ font-family: sans-serif; max-width: 40em; margin: 2em auto; color: #222; }}
h1 {{ font-size: 1.4em; }}
ul {{ list-style: none; padding: 0; }}
li {{ padding: 0.4em 0.6em; margin: 0.2em 0; border-left: 4px solid; }}
li.connected {{ border-color: #38a169; background: #f0fff4; }}
li.disconnected {{ border-color: #e53e3e; background: #fff5f5; }}
.empty {{ color: #888; font-style: italic; }}
footer {{ margin-top: 2em; color: #888; font-size: 0.85em; }}
</style>
</head>
<body>
<h1>S7 Bridge</h1>
<p>{total} PLCs configured &middot; {connected_count} connected &middot; {disconnected_count} disconnected</p>
<h2>Connected</h2>
{connected_list}
<h2>Disconnected</h2>
{disconnected_list}
<footer>Endpoints: /mcp (MCP server) &middot; /status (this page) &middot; uptime {uptime_secs}s</footer>
</body>
</html>"#,
        connected_count = connected.len(),
        disconnected_count = disconnected.len(),
        connected_list = list(connected, "connected", "No PLCs currently connected"),
        disconnected_list = list(disconnected, "disconnected", "No PLCs currently disconnected"),
        uptime_secs = uptime.as_secs(),
    )
}
