use availability_poller::PollerState;
use chrono::Local;

/// Render the poller state as a status line
pub fn render(state: &PollerState) -> String {
    let refreshed = state
        .last_refreshed
        .map(|at| at.with_timezone(&Local).format("%-m/%-d/%y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| "never".to_string());

    let status = match &state.snapshot {
        Some(snapshot) if snapshot.available => format!(
            "🟢 AVAILABLE ({}/{} free)",
            snapshot.available_count, snapshot.total_count
        ),
        Some(snapshot) => format!("🔴 BUSY (0/{} free)", snapshot.total_count),
        None => "🔴 UNKNOWN".to_string(),
    };

    let mut line = format!("Last refreshed: {} | {}", refreshed, status);

    if let Some(update) = state.last_update_display() {
        line.push_str(&format!(" | Last updated: {}", update));
    }
    if state.loading {
        line.push_str(" | refreshing…");
    }
    if let Some(error) = &state.last_error {
        line.push_str(&format!(" | ⚠️ {}", error));
    }

    line
}
