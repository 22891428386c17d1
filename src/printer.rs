use crate::clock::format_time;
use crate::console::{Console, Rgb};
use crate::entry::LogEntry;
use crate::error::Result;
use crate::level::{resolve, Field};
use crate::options::{ColorFn, LoggerOptions};
use serde_json::Value;
use std::io;

/// Written in place of a group end when the console cannot group.
pub const GROUP_END_FALLBACK: &str = "—— log end ——";

/// Renders queued entries as grouped console blocks.
pub struct Printer<C> {
    options: LoggerOptions,
    console: C,
    grouping: bool,
}

impl<C: Console> Printer<C> {
    pub fn new(options: LoggerOptions, console: C) -> Self {
        let grouping = console.supports_groups();
        if !grouping {
            log::debug!("actionlog: console has no grouping, printing flat blocks");
        }
        Printer {
            options,
            console,
            grouping,
        }
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Print every entry, in order, then leave `entries` empty.
    ///
    /// Each entry's next state and duration come from the entry after it
    /// when there is one (see [`LogEntry::paired`]). `now` is only used for
    /// a last entry that was never finalized.
    ///
    /// # Errors
    ///
    /// Returns the first console write error. `entries` is emptied even
    /// then, so nothing is printed twice.
    pub fn print(&mut self, entries: &mut Vec<LogEntry>, now: f64) -> Result<()> {
        let mut queue = entries.drain(..).peekable();
        while let Some(entry) = queue.next() {
            let (next_state, took) = entry.paired(queue.peek(), now);
            self.print_entry(&entry, next_state, took)?;
        }
        Ok(())
    }

    fn print_entry(&mut self, entry: &LogEntry, next_state: &Value, took: f64) -> Result<()> {
        let Printer {
            options,
            console,
            grouping,
        } = self;
        let colors = &options.colors;
        let prev_state = &entry.prev_state;

        let action = (options.action_transformer)(entry.action.clone());
        let collapsed = options.collapsed.resolve(next_state, &entry.action);
        let title = block_title(options, entry, &action, took);
        open_group(console, *grouping, &title, paint(&colors.title, &action), collapsed)?;

        if let Some(level) = resolve(&options.level, &action, &[prev_state], Field::PrevState) {
            let color = paint(&colors.prev_state, prev_state);
            console.line(level, Field::PrevState.label(), color, prev_state)?;
        }

        if let Some(level) = resolve(&options.level, &action, &[&action], Field::Action) {
            let color = paint(&colors.action, &action);
            console.line(level, Field::Action.label(), color, &action)?;
        }

        if let Some(error) = &entry.error {
            let payload = [error, prev_state];
            if let Some(level) = resolve(&options.level, &action, &payload, Field::Error) {
                let color = colors
                    .error
                    .as_ref()
                    .and_then(|f| parse_color(&f(error, prev_state)));
                console.line(level, Field::Error.label(), color, error)?;
            }
        }

        if let Some(level) = resolve(&options.level, &action, &[next_state], Field::NextState) {
            let color = paint(&colors.next_state, next_state);
            console.line(level, Field::NextState.label(), color, next_state)?;
        }

        close_group(console, *grouping)
    }
}

fn block_title(options: &LoggerOptions, entry: &LogEntry, action: &Value, took: f64) -> String {
    let mut parts = vec!["action".to_string()];
    if options.timestamp {
        parts.push(format_time(&entry.started_time));
    }
    parts.push(
        action
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("(no type)")
            .to_string(),
    );
    if options.duration {
        parts.push(format!("(in {took:.2} ms)"));
    }
    parts.join(" ")
}

fn open_group<C: Console>(
    console: &mut C,
    grouping: bool,
    title: &str,
    color: Option<Rgb>,
    collapsed: bool,
) -> Result<()> {
    if grouping {
        match console.begin_group(title, color, collapsed) {
            Err(e) if e.kind() == io::ErrorKind::Unsupported => {
                log::debug!("actionlog: begin_group unsupported: {e}");
            }
            result => {
                result?;
                return Ok(());
            }
        }
    }
    console.plain(title)?;
    Ok(())
}

fn close_group<C: Console>(console: &mut C, grouping: bool) -> Result<()> {
    if grouping {
        match console.end_group() {
            Err(e) if e.kind() == io::ErrorKind::Unsupported => {
                log::debug!("actionlog: end_group unsupported: {e}");
            }
            result => {
                result?;
                return Ok(());
            }
        }
    }
    console.plain(GROUP_END_FALLBACK)?;
    Ok(())
}

fn paint(color: &Option<ColorFn>, value: &Value) -> Option<Rgb> {
    color.as_ref().and_then(|f| parse_color(&f(value)))
}

fn parse_color(color: &str) -> Option<Rgb> {
    let rgb = Rgb::parse(color);
    if rgb.is_none() {
        log::debug!("actionlog: ignoring unparsable color {color:?}");
    }
    rgb
}
