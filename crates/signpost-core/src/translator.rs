//! Applying formatted events to output sinks.

use crate::error::Result;
use crate::event::Event;
use crate::format::{render, Channel, Emission};
use crate::options::Options;
use crate::xml::{parse_fragment, ReportNode};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Writes the output of each report to a stdout-like and a stderr-like sink.
///
/// Every method takes `&mut self`, so one translator handles one report at a
/// time. Sinks are flushed after each event and never closed.
pub struct Translator<O: Write, E: Write> {
    options: Options,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Translator<O, E> {
    pub fn new(options: Options, out: O, err: E) -> Self {
        Self { options, out, err }
    }

    /// Translate one XML report. Returns the number of emissions written.
    ///
    /// A rejected report (malformed or missing a required field) writes
    /// nothing.
    pub fn handle_report(&mut self, report: &str) -> Result<usize> {
        let node = parse_fragment(report)?;
        self.handle_node(&node)
    }

    pub fn handle_node(&mut self, node: &ReportNode) -> Result<usize> {
        match Event::from_node(node)? {
            Some(event) => self.handle_event(&event),
            None => {
                tracing::trace!(tag = %node.tag, "ignoring unknown report kind");
                Ok(0)
            }
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> Result<usize> {
        let emissions = render(event, &self.options);
        for emission in &emissions {
            self.write(emission)?;
        }
        self.out.flush()?;
        self.err.flush()?;
        tracing::debug!(event = event.tag(), emitted = emissions.len(), "translated report");
        Ok(emissions.len())
    }

    fn write(&mut self, emission: &Emission) -> io::Result<()> {
        match emission {
            Emission::Message { channel, message } => match channel {
                Channel::Stdout => writeln!(self.out, "{message}"),
                Channel::Stderr => writeln!(self.err, "{message}"),
            },
            Emission::Line(line) => writeln!(self.out, "{line}"),
            Emission::Raw(text) => self.out.write_all(text.as_bytes()),
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// Entry point for report producers that may run on several threads.
pub trait ReportListener: Send + Sync {
    fn on_report(&self, report: &str) -> Result<usize>;
}

/// Reports are parsed outside the lock; each event's output is written
/// entirely while holding it, so lines of two events never interleave.
impl<O: Write + Send, E: Write + Send> ReportListener for Mutex<Translator<O, E>> {
    fn on_report(&self, report: &str) -> Result<usize> {
        let node = parse_fragment(report)?;
        let Some(event) = Event::from_node(&node)? else {
            tracing::trace!(tag = %node.tag, "ignoring unknown report kind");
            return Ok(0);
        };
        let mut translator = self.lock().unwrap_or_else(PoisonError::into_inner);
        translator.handle_event(&event)
    }
}
