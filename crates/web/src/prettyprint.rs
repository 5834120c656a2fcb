use chrono::Utc;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        format::{FormatEvent, FormatFields, Writer},
        FmtContext,
    },
    registry::LookupSpan,
};

/// One line per event: time, a tree marker indented by span depth, level,
/// the innermost span name and the event fields.
///
/// ```text
/// 12:00:01.250 └─  INFO [log_mood] Mood logged timestamp=2024-06-03T12:00:00Z
/// ```
pub struct PrettyFormatter {
    show_target: bool,
}

impl PrettyFormatter {
    pub fn new(show_target: bool) -> Self {
        Self { show_target }
    }
}

pub(crate) fn tree_prefix(depth: usize) -> String {
    match depth {
        0 => String::new(),
        depth => format!("{}└─ ", "  ".repeat(depth - 1)),
    }
}

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let depth = ctx.event_scope().map(|scope| scope.count()).unwrap_or(0);

        write!(
            writer,
            "{} {}{:>5} ",
            Utc::now().format("%H:%M:%S%.3f"),
            tree_prefix(depth),
            meta.level().as_str()
        )?;
        if self.show_target {
            write!(writer, "{}: ", meta.target())?;
        }
        if let Some(span) = ctx.event_scope().and_then(|mut scope| scope.next()) {
            write!(writer, "[{}] ", span.name())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
