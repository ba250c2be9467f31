//! The scrolling results table.
//!
//! ```text
//!        Cloudflare Bad
//!        ---------- ---------
//!     1) 12ms       FAIL
//!     2) 11ms       FAIL
//! ```

use std::io::{self, Write};

use colored::*;
use crossterm::cursor::MoveToColumn;
use crossterm::terminal::{Clear, ClearType};

use mping_common::network::target::ResolvedTarget;
use mping_core::engine::PingResult;
use mping_core::report::Reporter;
use mping_core::stats::{PingStats, Statistics};

use crate::terminal::{colors, format};

/// Visible width of the `{:>5})` round counter.
const ROW_PREFIX_WIDTH: usize = 6;

pub struct TableReporter<W: Write> {
    out: W,
    labels: Vec<String>,
    widths: Vec<usize>,
    show_rtt: bool,
    clear_line_on_interrupt: bool,
}

impl<W: Write> TableReporter<W> {
    pub fn new(out: W, targets: &[ResolvedTarget], show_rtt: bool) -> Self {
        Self {
            out,
            labels: targets.iter().map(|t| t.label.clone()).collect(),
            widths: format::column_widths(targets),
            show_rtt,
            clear_line_on_interrupt: false,
        }
    }

    /// Wipes the terminal line (where the shell echoed `^C`) before the
    /// summary of an interrupted session. Only useful on a real terminal.
    pub fn clear_line_on_interrupt(mut self, enabled: bool) -> Self {
        self.clear_line_on_interrupt = enabled;
        self
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_header(&mut self) -> io::Result<()> {
        let indent = " ".repeat(ROW_PREFIX_WIDTH);

        let labels: String = self
            .labels
            .iter()
            .zip(&self.widths)
            .map(|(label, width)| format!(" {}", format::pad(&label.color(colors::LABEL).to_string(), *width)))
            .collect();
        let dashes: String = self
            .widths
            .iter()
            .map(|width| format!(" {}", "-".repeat(*width).color(colors::SEPARATOR)))
            .collect();

        writeln!(self.out)?;
        writeln!(self.out, "{indent}{labels}")?;
        writeln!(self.out, "{indent}{dashes}")
    }

    fn write_summary_row<F>(&mut self, name: &str, stats: &Statistics, cell: F) -> io::Result<()>
    where
        F: Fn(&PingStats) -> ColoredString,
    {
        let cells: String = stats
            .iter()
            .zip(&self.widths)
            .map(|(s, width)| format!(" {}", format::pad(&cell(s).to_string(), *width)))
            .collect();
        writeln!(self.out, "{name:<ROW_PREFIX_WIDTH$}{cells}")
    }
}

impl<W: Write> Reporter for TableReporter<W> {
    fn round(&mut self, round: u32, results: &[PingResult], show_labels: bool) -> io::Result<()> {
        if show_labels {
            self.write_header()?;
        }

        let counter = format!("{round:>5})").color(colors::ROUND);
        let cells: String = results
            .iter()
            .zip(&self.widths)
            .map(|(result, width)| {
                let cell = format::result_cell(result, self.show_rtt).to_string();
                format!(" {}", format::pad(&cell, *width))
            })
            .collect();

        writeln!(self.out, "{counter}{cells}")?;
        self.out.flush()
    }

    fn summary(&mut self, stats: &Statistics, interrupted: bool) -> io::Result<()> {
        if interrupted && self.clear_line_on_interrupt {
            crossterm::execute!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        }

        writeln!(self.out)?;
        self.write_summary_row("Sent", stats, |s| s.total().to_string().normal())?;
        self.write_summary_row("Fails", stats, |s| s.failure_count().to_string().normal())?;
        self.write_summary_row("Loss", stats, format::loss_cell)?;
        self.write_summary_row("RTT", stats, format::avg_rtt_cell)?;
        self.out.flush()
    }
}
