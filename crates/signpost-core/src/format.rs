//! Event formatting.
//!
//! Each output channel has its own pure function: [`build_messages`] for
//! TeamCity service messages and [`console_output`] for plain console text.
//! [`render`] concatenates them, service messages first.

use crate::event::{Event, Outcome, Output, OutputStream, TestCaseFinished};
use crate::message::ServiceMessage;
use crate::options::Options;

pub const LABEL_PREFIX: &str = "***** ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stdout,
    Stderr,
}

/// One unit of output produced for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// A service message, written as one line.
    Message {
        channel: Channel,
        message: ServiceMessage,
    },
    /// A console line; a newline is appended when written.
    Line(String),
    /// Captured text, written exactly as is.
    Raw(String),
}

impl Emission {
    pub fn channel(&self) -> Channel {
        match self {
            Self::Message { channel, .. } => *channel,
            Self::Line(_) | Self::Raw(_) => Channel::Stdout,
        }
    }

    #[cfg(test)]
    pub(crate) fn as_message(&self) -> Option<&ServiceMessage> {
        match self {
            Self::Message { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Everything `event` produces under `options`, in write order.
pub fn render(event: &Event, options: &Options) -> Vec<Emission> {
    let mut out = build_messages(event, options);
    out.extend(console_output(event, options));
    out
}

/// Service messages for `event`; empty when build messages are disabled.
pub fn build_messages(event: &Event, options: &Options) -> Vec<Emission> {
    if !options.build_messages {
        return Vec::new();
    }

    let messages = match event {
        Event::SuiteStarted(e) => vec![stdout(
            ServiceMessage::new("testSuiteStarted").attr("name", &e.subject.name),
        )],
        Event::SuiteFinished(e) => vec![stdout(
            ServiceMessage::new("testSuiteFinished").attr("name", &e.subject.name),
        )],
        Event::TestStarted(e) => vec![stdout(
            ServiceMessage::new("testStarted")
                .attr("name", &e.subject.name)
                .attr("captureStandardOutput", "true"),
        )],
        Event::TestCaseFinished(e) => test_case_messages(e),
        Event::Output(e) => output_messages(e),
    };

    let flow_id = options.flow_ids.then(|| event.flow_id()).flatten();
    messages
        .into_iter()
        .map(|(channel, message)| Emission::Message {
            channel,
            message: match flow_id {
                Some(id) => message.attr("flowId", id),
                None => message,
            },
        })
        .collect()
}

/// Plain console output for `event`.
pub fn console_output(event: &Event, options: &Options) -> Vec<Emission> {
    match event {
        Event::TestStarted(e) if options.labels => {
            vec![Emission::Line(format!("{LABEL_PREFIX}{}", e.subject.name))]
        }
        Event::Output(e) if e.stream == OutputStream::Out => {
            vec![Emission::Raw(e.text().to_string())]
        }
        _ => Vec::new(),
    }
}

fn stdout(message: ServiceMessage) -> (Channel, ServiceMessage) {
    (Channel::Stdout, message)
}

fn test_case_messages(e: &TestCaseFinished) -> Vec<(Channel, ServiceMessage)> {
    let name = &e.subject.name;
    let finished = || {
        ServiceMessage::new("testFinished")
            .attr("name", name)
            .attr("duration", e.duration_ms())
    };
    match &e.outcome {
        Outcome::Passed => vec![stdout(finished())],
        Outcome::Inconclusive => vec![stdout(
            ServiceMessage::new("testIgnored")
                .attr("name", name)
                .attr("message", "Inconclusive"),
        )],
        Outcome::Skipped { reason } => vec![stdout(
            ServiceMessage::new("testIgnored")
                .attr("name", name)
                .attr("message", reason),
        )],
        Outcome::Failed {
            message,
            stack_trace,
        } => vec![
            stdout(
                ServiceMessage::new("testFailed")
                    .attr("name", name)
                    .attr("message", message)
                    .attr("details", stack_trace),
            ),
            stdout(finished()),
        ],
        Outcome::Other(result) => {
            tracing::trace!(test = %name, result = %result, "ignoring unknown test result");
            Vec::new()
        }
    }
}

fn output_messages(e: &Output) -> Vec<(Channel, ServiceMessage)> {
    match &e.stream {
        OutputStream::Out => vec![stdout(ServiceMessage::new("message").attr("text", e.text()))],
        OutputStream::Error => vec![(
            Channel::Stderr,
            ServiceMessage::new("message")
                .attr("text", e.text())
                .attr("status", "ERROR"),
        )],
        OutputStream::Other(kind) => {
            tracing::trace!(stream = %kind, "ignoring unknown output stream");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Subject, TestStarted};

    fn started(name: &str) -> Event {
        Event::TestStarted(TestStarted {
            subject: Subject {
                name: name.into(),
                ..Subject::default()
            },
        })
    }

    fn lines(emissions: &[Emission]) -> Vec<String> {
        emissions
            .iter()
            .map(|e| match e {
                Emission::Message { message, .. } => message.to_string(),
                Emission::Line(l) | Emission::Raw(l) => l.clone(),
            })
            .collect()
    }

    #[test]
    fn nothing_when_everything_is_off() {
        assert!(render(&started("T"), &Options::default()).is_empty());
    }

    #[test]
    fn label_only() {
        let out = render(&started("Calc.Adds"), &Options::default().with_labels(true));
        assert_eq!(out, vec![Emission::Line("***** Calc.Adds".into())]);
    }

    #[test]
    fn build_message_precedes_label() {
        let out = render(&started("T"), &Options::teamcity().with_labels(true));
        assert_eq!(
            lines(&out),
            [
                "##teamcity[testStarted name='T' captureStandardOutput='true']",
                "***** T"
            ]
        );
    }

    #[test]
    fn label_is_not_escaped() {
        let out = console_output(&started("It's [x]"), &Options::default().with_labels(true));
        assert_eq!(lines(&out), ["***** It's [x]"]);
    }

    #[test]
    fn output_error_goes_to_stderr() {
        let event = Event::Output(Output::new(OutputStream::Error, "bad\n"));
        let out = render(&event, &Options::teamcity());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].channel(), Channel::Stderr);
        assert_eq!(
            lines(&out),
            ["##teamcity[message text='bad|n' status='ERROR']"]
        );
    }

    #[test]
    fn output_error_without_build_messages_is_silent() {
        let event = Event::Output(Output::new(OutputStream::Error, "bad"));
        assert!(render(&event, &Options::default().with_labels(true)).is_empty());
    }

    #[test]
    fn unknown_output_stream_is_silent() {
        let event = Event::Output(Output::new(OutputStream::Other("Progress".into()), "x"));
        assert!(render(&event, &Options::teamcity()).is_empty());
    }

    #[test]
    fn flow_id_is_appended_when_enabled() {
        let event = Event::TestStarted(TestStarted {
            subject: Subject {
                name: "T".into(),
                id: Some("0-1001".into()),
                ..Subject::default()
            },
        });
        let out = build_messages(&event, &Options::teamcity().with_flow_ids(true));
        assert_eq!(
            lines(&out),
            ["##teamcity[testStarted name='T' captureStandardOutput='true' flowId='0-1001']"]
        );
        let out = build_messages(&event, &Options::teamcity());
        assert_eq!(out[0].as_message().unwrap().get("flowId"), None);
    }
}
