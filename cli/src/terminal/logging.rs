use colored::*;
use tracing::{Event, Level, Subscriber, debug};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

use crate::terminal::spinner::SpinnerWriter;

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str =
    "warn,mping=debug,mping_cli=debug,mping_core=debug,mping_common=debug,mping_protocols=debug";

pub struct MpingFormatter;

impl<S, N> FormatEvent<S, N> for MpingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[+]", |s| s.green().bold()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Installs the global subscriber. Log lines go to stderr, routed around the
/// resolution spinner while it is on screen.
///
/// `RUST_LOG` wins over the default filter, `--verbose` wins over both.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::fmt()
        .event_format(MpingFormatter)
        .with_env_filter(filter)
        .with_writer(|| SpinnerWriter)
        .init();

    if verbose {
        debug!("Verbose logging enabled");
    }
}
