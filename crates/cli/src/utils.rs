use std::time::Duration;

use jutsu::errors::*;

use crate::constants::*;

pub fn estimate_eta(downloaded: u64, total: u64, elapsed: Duration) -> Option<Duration> {
    if downloaded == 0 || total <= downloaded || elapsed.is_zero() {
        return None;
    }

    let speed = downloaded as f64 / elapsed.as_secs_f64();
    if speed <= 0.0 {
        return None;
    }

    let remaining = (total - downloaded) as f64 / speed;
    Some(Duration::from_secs_f64(remaining.max(0.0)))
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let mins = secs / 60;
    let rem = secs % 60;
    format!("{mins:02}:{rem:02}")
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    format_bytes_f64(bytes as f64)
}

pub fn format_bytes_f64(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes;
    let mut unit = 0usize;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{:.0} {}", value, UNITS[unit])
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// turns a show slug, show link or any page under a show into the show's url.
pub fn normalize_show_link(raw: &str) -> Result<String> {
    let input = raw.trim();

    if SLUG_RE.is_match(input) {
        return Ok(format!("https://{JUTSU_DOMAIN}/{input}/"));
    }

    if let Some(caps) = SHOW_LINK_RE.captures(input)
        && let Some(slug) = caps.get(1).map(|m| m.as_str())
    {
        return Ok(format!("https://{JUTSU_DOMAIN}/{slug}/"));
    }

    Err(JutsuError::Message(format!(
        "invalid show URL: expected a {JUTSU_DOMAIN}/<show> link, got {input:?}"
    )))
}

/// renders `err` followed by every source not already part of its message.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();

    while let Some(inner) = source {
        let message = inner.to_string();
        if !text.contains(&message) {
            text.push_str(": ");
            text.push_str(&message);
        }
        source = inner.source();
    }

    text
}
