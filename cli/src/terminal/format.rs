use std::time::Duration;

use colored::*;

use mping_common::network::target::ResolvedTarget;
use mping_core::engine::PingResult;
use mping_core::stats::PingStats;

use crate::terminal::colors;

/// Narrowest a column may be, so short labels still fit `100.0%` and friends.
pub const MIN_COLUMN_WIDTH: usize = 9;

const SLOW_RTT: Duration = Duration::from_millis(100);
const BAD_RTT: Duration = Duration::from_millis(200);

pub fn column_widths(targets: &[ResolvedTarget]) -> Vec<usize> {
    targets
        .iter()
        .map(|target| console::measure_text_width(&target.label).max(MIN_COLUMN_WIDTH))
        .collect()
}

/// Left-aligns `cell` in `width` visible columns. ANSI codes take no room.
pub fn pad(cell: &str, width: usize) -> String {
    let visible = console::measure_text_width(cell);
    format!("{cell}{}", " ".repeat(width.saturating_sub(visible)))
}

pub fn fmt_rtt(rtt: Duration) -> String {
    if rtt < Duration::from_millis(1) {
        return "<1ms".to_string();
    }
    format!("{}ms", rtt.as_millis())
}

pub fn rtt_cell(rtt: Duration) -> ColoredString {
    let color = if rtt < SLOW_RTT {
        colors::RTT_FAST
    } else if rtt < BAD_RTT {
        colors::RTT_SLOW
    } else {
        colors::RTT_BAD
    };
    fmt_rtt(rtt).color(color)
}

pub fn result_cell(result: &PingResult, show_rtt: bool) -> ColoredString {
    match result.rtt() {
        Some(rtt) if show_rtt => rtt_cell(rtt),
        Some(_) => "".normal(),
        None => "FAIL".red().bold(),
    }
}

pub fn loss_cell(stats: &PingStats) -> ColoredString {
    let loss = stats.loss_percent();
    let text = format!("{loss:.1}%");
    if stats.total() == 0 || loss == 0.0 {
        text.normal()
    } else if loss >= 100.0 {
        text.red().bold()
    } else {
        text.yellow()
    }
}

pub fn avg_rtt_cell(stats: &PingStats) -> ColoredString {
    if stats.has_rtt() {
        fmt_rtt(stats.avg_rtt()).normal()
    } else {
        "-".dimmed()
    }
}
