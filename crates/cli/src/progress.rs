use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::{cursor::*, execute, terminal::*};
use jutsu_downloader::DownloadEvent;
use owo_colors::OwoColorize;

use crate::utils::*;

const BAR_WIDTH: usize = 43;
const PULSE_WIDTH: usize = 8;

/// draws a two-line progress view for one episode download.
pub struct DownloadProgressRenderer {
    enabled: bool,
    initialized: bool,
    spinner_step: usize,
    started_at: Option<Instant>,
    downloaded: u64,
    finished: bool,
    total: Option<u64>,
}

impl DownloadProgressRenderer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            initialized: false,
            spinner_step: 0,
            started_at: None,
            downloaded: 0,
            finished: false,
            total: None,
        }
    }

    pub fn handle(&mut self, event: DownloadEvent) {
        if !self.enabled {
            return;
        }

        match event {
            DownloadEvent::Started { total_bytes } => {
                self.total = total_bytes;
                self.downloaded = 0;
                self.finished = false;
                self.started_at = Some(Instant::now());
            }
            DownloadEvent::Progress {
                downloaded_bytes,
                total_bytes,
                elapsed,
            } => {
                self.total = total_bytes;
                self.downloaded = downloaded_bytes;
                self.started_at = Some(Instant::now() - elapsed);
            }
            DownloadEvent::Finished {
                downloaded_bytes,
                elapsed,
            } => {
                self.downloaded = downloaded_bytes;
                self.started_at = Some(Instant::now() - elapsed);
                self.finished = true;
            }
        }
        self.draw_current();
    }

    pub fn tick(&mut self) {
        if !self.enabled || self.finished || self.started_at.is_none() {
            return;
        }
        self.draw_current();
    }

    fn draw_current(&mut self) {
        let elapsed = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or(Duration::ZERO);
        self.draw_frame(elapsed);
    }

    fn draw_frame(&mut self, elapsed: Duration) {
        let mut stdout = std::io::stdout();

        if !self.initialized {
            let _ = writeln!(stdout);
            let _ = writeln!(stdout);
            self.initialized = true;
        }

        let spinner = if self.finished {
            "✓"
        } else {
            const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            FRAMES[self.spinner_step % FRAMES.len()]
        };
        let bar = render_bar(self.downloaded, self.total, self.finished, self.spinner_step);
        self.spinner_step = self.spinner_step.wrapping_add(1);

        let speed_bps = if elapsed.as_secs_f64() > 0.0 {
            self.downloaded as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let speed_text = format!("{}/s", format_bytes_f64(speed_bps));

        let eta_text = self
            .total
            .and_then(|total| estimate_eta(self.downloaded, total, elapsed))
            .map(format_duration)
            .unwrap_or_else(|| "--:--".to_string());
        let downloaded_text = format_bytes(self.downloaded);
        let total_text = self
            .total
            .map(format_bytes)
            .unwrap_or_else(|| "unknown".to_string());

        let spinner = format!("[{spinner}]").cyan().to_string();
        let bar = bar.green().to_string();
        let downloaded_text = downloaded_text.yellow().to_string();
        let total_text = total_text.dimmed().to_string();
        let eta_text = eta_text.magenta().to_string();

        let _ = execute!(stdout, MoveUp(2), Clear(ClearType::FromCursorDown));
        let _ = writeln!(stdout, "{spinner} {bar}  eta {eta_text}");
        let _ = writeln!(
            stdout,
            "{downloaded_text:>14} / {total_text:<14}  {speed_text:>16}"
        );
        let _ = stdout.flush();
    }
}

/// a filled bar for known totals; a moving pulse when the server sent no length.
fn render_bar(downloaded: u64, total: Option<u64>, done: bool, step: usize) -> String {
    let Some(total) = total else {
        if done {
            return format!("[{}]", "█".repeat(BAR_WIDTH));
        }
        let travel = BAR_WIDTH - PULSE_WIDTH;
        let offset = step % (travel * 2);
        let start = if offset > travel { travel * 2 - offset } else { offset };
        return format!(
            "[{}{}{}]",
            " ".repeat(start),
            "█".repeat(PULSE_WIDTH),
            " ".repeat(travel - start)
        );
    };

    let ratio = if total == 0 {
        1.0
    } else {
        (downloaded as f64 / total as f64).clamp(0.0, 1.0)
    };
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), " ".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(bar: &str) -> (usize, usize) {
        let filled = bar.chars().filter(|c| *c == '█').count();
        let empty = bar.chars().filter(|c| *c == ' ').count();
        (filled, empty)
    }

    #[test]
    fn known_total_fills_proportionally() {
        assert_eq!(cells(&render_bar(0, Some(100), false, 0)), (0, BAR_WIDTH));
        assert_eq!(cells(&render_bar(50, Some(100), false, 0)), (22, 21));
        assert_eq!(cells(&render_bar(100, Some(100), true, 0)), (BAR_WIDTH, 0));
        assert_eq!(cells(&render_bar(0, Some(0), false, 0)), (BAR_WIDTH, 0));
    }

    #[test]
    fn unknown_total_draws_a_pulse_that_stays_inside() {
        for step in 0..200 {
            let bar = render_bar(1234, None, false, step);
            assert_eq!(cells(&bar), (PULSE_WIDTH, BAR_WIDTH - PULSE_WIDTH));
        }
        assert_ne!(render_bar(1, None, false, 0), render_bar(1, None, false, 5));
        assert_eq!(cells(&render_bar(1, None, true, 3)), (BAR_WIDTH, 0));
    }
}
