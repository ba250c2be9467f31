use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// The spinner currently on screen, if any. Log output is printed through it.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// A spinner on stderr that disappears when dropped.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(message: String) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_strings(TICK_STRINGS));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut active) = ACTIVE.lock() {
            *active = Some(pb.clone());
        }
        Self { pb }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Ok(mut active) = ACTIVE.lock() {
            *active = None;
        }
        self.pb.finish_and_clear();
    }
}

pub fn start_resolution_spinner(count: usize) -> Spinner {
    let unit = if count == 1 { "target" } else { "targets" };
    Spinner::start(format!(
        "Resolving {} {unit}...",
        count.to_string().green().bold()
    ))
}

/// Writes to stderr, or above the active spinner so it is not torn apart.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let active = ACTIVE
            .lock()
            .map(|guard| Option::clone(&guard))
            .unwrap_or_default();

        write_around(active.as_ref(), buf, &mut io::stderr())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// A hidden bar (stderr is not a terminal) swallows `println`, so log lines
/// only go through a spinner that is actually drawn.
fn write_around(active: Option<&ProgressBar>, buf: &[u8], fallback: &mut impl Write) -> io::Result<()> {
    match active {
        Some(pb) if !pb.is_hidden() => {
            let msg = String::from_utf8_lossy(buf);
            pb.println(msg.trim_end());
            Ok(())
        }
        _ => fallback.write_all(buf),
    }
}
