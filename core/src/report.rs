//! The presentation port.
//!
//! The engine hands every completed round and the final statistics to a
//! [`Reporter`]. It never formats anything itself.

use std::io;

use crate::engine::PingResult;
use crate::stats::Statistics;

pub trait Reporter {
    /// One completed round, in target order. `show_labels` asks for the
    /// column header to be repeated above the row.
    fn round(&mut self, round: u32, results: &[PingResult], show_labels: bool) -> io::Result<()>;

    /// Final statistics. Called exactly once per session, also after an
    /// interrupt, in which case `interrupted` is set.
    fn summary(&mut self, stats: &Statistics, interrupted: bool) -> io::Result<()>;
}
