//! Console sinks the printer writes to.
//!
//! A sink either supports visual grouping ([`TerminalConsole`]) or it does
//! not ([`FlatConsole`]); the printer asks once, when it is built.

use crate::level::Level;
use owo_colors::OwoColorize;
use serde_json::Value;
use std::io::{self, IsTerminal, Write};

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB` or `#RGB` (the leading `#` is optional).
    ///
    /// ```
    /// use actionlog::Rgb;
    ///
    /// assert_eq!(Rgb::parse("#4CAF50"), Some(Rgb(0x4C, 0xAF, 0x50)));
    /// assert_eq!(Rgb::parse("fa0"), Some(Rgb(0xFF, 0xAA, 0x00)));
    /// assert_eq!(Rgb::parse("tomato"), None);
    /// ```
    pub fn parse(color: &str) -> Option<Rgb> {
        let hex = color.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|c| c * 17);
                Some(Rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }
}

/// Where printed blocks go.
pub trait Console {
    /// Whether `begin_group`/`end_group` are available.
    fn supports_groups(&self) -> bool {
        true
    }

    /// Open a visual group titled `title`.
    ///
    /// Sinks without grouping return an [`io::ErrorKind::Unsupported`] error.
    fn begin_group(&mut self, title: &str, color: Option<Rgb>, collapsed: bool) -> io::Result<()>;

    /// Close the innermost open group.
    fn end_group(&mut self) -> io::Result<()>;

    /// Emit one labelled payload at `level`.
    fn line(&mut self, level: Level, label: &str, color: Option<Rgb>, payload: &Value)
    -> io::Result<()>;

    /// Emit a bare line of text.
    fn plain(&mut self, text: &str) -> io::Result<()>;
}

impl<C: Console + ?Sized> Console for Box<C> {
    fn supports_groups(&self) -> bool {
        (**self).supports_groups()
    }

    fn begin_group(&mut self, title: &str, color: Option<Rgb>, collapsed: bool) -> io::Result<()> {
        (**self).begin_group(title, color, collapsed)
    }

    fn end_group(&mut self) -> io::Result<()> {
        (**self).end_group()
    }

    fn line(
        &mut self,
        level: Level,
        label: &str,
        color: Option<Rgb>,
        payload: &Value,
    ) -> io::Result<()> {
        (**self).line(level, label, color, payload)
    }

    fn plain(&mut self, text: &str) -> io::Result<()> {
        (**self).plain(text)
    }
}

/// Pick a console for stdout: grouped and colored on a terminal, flat and
/// plain when redirected.
pub fn default_console() -> Box<dyn Console> {
    let stdout = io::stdout();
    if stdout.is_terminal() {
        Box::new(TerminalConsole::new(stdout, true))
    } else {
        Box::new(FlatConsole::new(stdout))
    }
}

fn level_tag(level: Level) -> String {
    match level {
        Level::Log => String::new(),
        other => format!("[{other}] "),
    }
}

fn to_json(payload: &Value, pretty: bool) -> io::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(payload)
    } else {
        serde_json::to_string(payload)
    };
    json.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Grouped output for a terminal.
///
/// Groups are shown by indentation under a `▾` (expanded) or `▸`
/// (collapsed) marker. Payloads are pretty-printed inside expanded groups
/// and kept on one line inside collapsed ones.
pub struct TerminalConsole<W> {
    out: W,
    colored: bool,
    groups: Vec<bool>,
}

impl<W: Write> TerminalConsole<W> {
    pub fn new(out: W, colored: bool) -> Self {
        TerminalConsole {
            out,
            colored,
            groups: Vec::new(),
        }
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn indent(&self) -> String {
        "  ".repeat(self.groups.len())
    }

    fn paint(&self, text: &str, color: Option<Rgb>, bold: bool) -> String {
        match color {
            Some(Rgb(r, g, b)) if self.colored => {
                if bold {
                    text.truecolor(r, g, b).bold().to_string()
                } else {
                    text.truecolor(r, g, b).to_string()
                }
            }
            _ => text.to_string(),
        }
    }
}

impl<W: Write> Console for TerminalConsole<W> {
    fn begin_group(&mut self, title: &str, color: Option<Rgb>, collapsed: bool) -> io::Result<()> {
        let marker = if collapsed { '▸' } else { '▾' };
        let title = self.paint(title, color, false);
        writeln!(self.out, "{}{marker} {title}", self.indent())?;
        self.groups.push(collapsed);
        Ok(())
    }

    fn end_group(&mut self) -> io::Result<()> {
        self.groups.pop();
        self.out.flush()
    }

    fn line(
        &mut self,
        level: Level,
        label: &str,
        color: Option<Rgb>,
        payload: &Value,
    ) -> io::Result<()> {
        let collapsed = self.groups.last().copied().unwrap_or(false);
        let json = to_json(payload, !collapsed)?;
        let indent = self.indent();
        let label = self.paint(label, color, true);
        let mut lines = json.lines();
        writeln!(
            self.out,
            "{indent}{}{label} {}",
            level_tag(level),
            lines.next().unwrap_or_default()
        )?;
        for rest in lines {
            writeln!(self.out, "{indent}  {rest}")?;
        }
        Ok(())
    }

    fn plain(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}{text}", self.indent())
    }
}

/// Flat, uncolored output with no grouping support.
pub struct FlatConsole<W> {
    out: W,
}

impl<W: Write> FlatConsole<W> {
    pub fn new(out: W) -> Self {
        FlatConsole { out }
    }

    /// The underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Console for FlatConsole<W> {
    fn supports_groups(&self) -> bool {
        false
    }

    fn begin_group(
        &mut self,
        _title: &str,
        _color: Option<Rgb>,
        _collapsed: bool,
    ) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "console grouping is not supported",
        ))
    }

    fn end_group(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "console grouping is not supported",
        ))
    }

    fn line(
        &mut self,
        level: Level,
        label: &str,
        _color: Option<Rgb>,
        payload: &Value,
    ) -> io::Result<()> {
        let json = to_json(payload, false)?;
        writeln!(self.out, "{}{label} {json}", level_tag(level))
    }

    fn plain(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }
}

/// One call made against a [`RecordingConsole`].
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    GroupStart {
        title: String,
        color: Option<Rgb>,
        collapsed: bool,
    },
    GroupEnd,
    Line {
        level: Level,
        label: String,
        color: Option<Rgb>,
        payload: Value,
    },
    Plain(String),
}

/// Keeps every console call in memory.
///
/// Useful for asserting on logger output, or for handing entries to a UI
/// instead of a terminal.
#[derive(Debug, Clone, Default)]
pub struct RecordingConsole {
    records: Vec<Record>,
    flat: bool,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recording console that reports no grouping support.
    pub fn flat() -> Self {
        RecordingConsole {
            records: Vec::new(),
            flat: true,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    fn unsupported(&self) -> io::Result<()> {
        if self.flat {
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "console grouping is not supported",
            ))
        } else {
            Ok(())
        }
    }
}

impl Console for RecordingConsole {
    fn supports_groups(&self) -> bool {
        !self.flat
    }

    fn begin_group(&mut self, title: &str, color: Option<Rgb>, collapsed: bool) -> io::Result<()> {
        self.unsupported()?;
        self.records.push(Record::GroupStart {
            title: title.to_string(),
            color,
            collapsed,
        });
        Ok(())
    }

    fn end_group(&mut self) -> io::Result<()> {
        self.unsupported()?;
        self.records.push(Record::GroupEnd);
        Ok(())
    }

    fn line(
        &mut self,
        level: Level,
        label: &str,
        color: Option<Rgb>,
        payload: &Value,
    ) -> io::Result<()> {
        self.records.push(Record::Line {
            level,
            label: label.to_string(),
            color,
            payload: payload.clone(),
        });
        Ok(())
    }

    fn plain(&mut self, text: &str) -> io::Result<()> {
        self.records.push(Record::Plain(text.to_string()));
        Ok(())
    }
}
