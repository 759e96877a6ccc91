//! Line formatting shared by the console and text sinks

use glint_core::CheckOutcome;

/// `[+]`, `[-]` or `[!]` for an outcome
pub fn marker(outcome: &CheckOutcome) -> String {
    format!("[{}]", outcome.status.sign())
}

/// `<check> <msg> (<url>) extra: k:v ...`, without the marker
pub fn describe(check: &str, outcome: &CheckOutcome) -> String {
    let mut line = format!("{} {}", check, outcome.msg);
    if !outcome.url.is_empty() {
        line.push_str(&format!(" ({})", outcome.url));
    }
    if !outcome.extra.is_empty() {
        let pairs: Vec<String> = outcome
            .extra
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect();
        line.push_str(" extra: ");
        line.push_str(&pairs.join(" "));
    }
    line
}

/// Full plain-text line
pub fn line(check: &str, outcome: &CheckOutcome) -> String {
    format!("{} {}", marker(outcome), describe(check, outcome))
}
