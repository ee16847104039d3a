//! Typed progress events.
//!
//! Converting a [`ReportNode`] into an [`Event`] is the only place report
//! fields are looked up. Required fields are checked here, so formatters work
//! on values that are known to be present.

use crate::error::{ReportError, Result};
use crate::xml::ReportNode;

pub const TAG_SUITE_STARTED: &str = "start-suite";
pub const TAG_SUITE_FINISHED: &str = "test-suite";
pub const TAG_TEST_STARTED: &str = "start-test";
pub const TAG_TEST_CASE_FINISHED: &str = "test-case";
pub const TAG_OUTPUT: &str = "test-output";

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SuiteStarted(SuiteStarted),
    SuiteFinished(SuiteFinished),
    TestStarted(TestStarted),
    TestCaseFinished(TestCaseFinished),
    Output(Output),
}

/// Identity shared by every lifecycle event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subject {
    pub name: String,
    pub fullname: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteStarted {
    pub subject: Subject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteFinished {
    pub subject: Subject,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestStarted {
    pub subject: Subject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseFinished {
    pub subject: Subject,
    pub outcome: Outcome,
    /// Elapsed time in seconds, as reported.
    pub time_secs: f64,
    duration_ms: String,
}

impl TestCaseFinished {
    /// Elapsed time in milliseconds: the reported decimal with its point
    /// moved three places, so no binary rounding shows up (`0.000123` →
    /// `0.123`).
    pub fn duration_ms(&self) -> &str {
        &self.duration_ms
    }
}

/// Result of a finished test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Inconclusive,
    Skipped { reason: String },
    Failed { message: String, stack_trace: String },
    /// A result value this version does not know.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub stream: OutputStream,
    text: String,
    /// Id of the test that produced the output, when reported.
    pub test_id: Option<String>,
}

impl Output {
    pub fn new(stream: OutputStream, text: impl Into<String>) -> Self {
        Self {
            stream,
            text: text.into(),
            test_id: None,
        }
    }

    /// Captured text exactly as reported, line terminators included.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputStream {
    Out,
    Error,
    Other(String),
}

impl OutputStream {
    fn parse(value: &str) -> Self {
        match value {
            "Out" => Self::Out,
            "Error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Event {
    /// Classify a report node.
    ///
    /// Returns `Ok(None)` for tags this version does not know; those are not
    /// errors so newer report producers keep working.
    pub fn from_node(node: &ReportNode) -> Result<Option<Self>> {
        let event = match node.tag.as_str() {
            TAG_SUITE_STARTED => Self::SuiteStarted(SuiteStarted {
                subject: subject(node, TAG_SUITE_STARTED)?,
            }),
            TAG_SUITE_FINISHED => Self::SuiteFinished(SuiteFinished {
                subject: subject(node, TAG_SUITE_FINISHED)?,
                result: required_attr(node, TAG_SUITE_FINISHED, "result")?.to_string(),
            }),
            TAG_TEST_STARTED => Self::TestStarted(TestStarted {
                subject: subject(node, TAG_TEST_STARTED)?,
            }),
            TAG_TEST_CASE_FINISHED => Self::TestCaseFinished(test_case(node)?),
            TAG_OUTPUT => Self::Output(output(node)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::SuiteStarted(_) => TAG_SUITE_STARTED,
            Self::SuiteFinished(_) => TAG_SUITE_FINISHED,
            Self::TestStarted(_) => TAG_TEST_STARTED,
            Self::TestCaseFinished(_) => TAG_TEST_CASE_FINISHED,
            Self::Output(_) => TAG_OUTPUT,
        }
    }

    /// Report id used to group messages of one test, if any.
    pub fn flow_id(&self) -> Option<&str> {
        let id = match self {
            Self::SuiteStarted(e) => e.subject.id.as_deref(),
            Self::SuiteFinished(e) => e.subject.id.as_deref(),
            Self::TestStarted(e) => e.subject.id.as_deref(),
            Self::TestCaseFinished(e) => e.subject.id.as_deref(),
            Self::Output(e) => e.test_id.as_deref(),
        };
        id.filter(|id| !id.is_empty())
    }
}

/// Non-empty attribute value, or a missing-field error.
fn required_attr<'a>(node: &'a ReportNode, tag: &'static str, field: &'static str) -> Result<&'a str> {
    match node.attr(field) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ReportError::MissingField { tag, field }),
    }
}

fn subject(node: &ReportNode, tag: &'static str) -> Result<Subject> {
    Ok(Subject {
        name: required_attr(node, tag, "name")?.to_string(),
        fullname: node.attr("fullname").map(str::to_string),
        id: node.attr("id").map(str::to_string),
    })
}

fn test_case(node: &ReportNode) -> Result<TestCaseFinished> {
    const TAG: &str = TAG_TEST_CASE_FINISHED;
    let subject = subject(node, TAG)?;
    let result = required_attr(node, TAG, "result")?;
    let time = required_attr(node, TAG, "time")?;
    let (time_secs, duration_ms) = parse_seconds(time).ok_or_else(|| ReportError::InvalidField {
        tag: TAG,
        field: "time",
        value: time.to_string(),
    })?;

    let outcome = match result {
        "Passed" => Outcome::Passed,
        "Inconclusive" => Outcome::Inconclusive,
        "Skipped" => {
            let reason = node.child("reason").ok_or(ReportError::MissingField {
                tag: TAG,
                field: "reason",
            })?;
            Outcome::Skipped {
                reason: child_text(reason, "message"),
            }
        }
        "Failed" => {
            let failure = node.child("failure").ok_or(ReportError::MissingField {
                tag: TAG,
                field: "failure",
            })?;
            Outcome::Failed {
                message: child_text(failure, "message"),
                stack_trace: child_text(failure, "stack-trace"),
            }
        }
        other => Outcome::Other(other.to_string()),
    };

    Ok(TestCaseFinished {
        subject,
        outcome,
        time_secs,
        duration_ms,
    })
}

fn output(node: &ReportNode) -> Result<Output> {
    let stream = OutputStream::parse(required_attr(node, TAG_OUTPUT, "type")?);
    Ok(Output {
        stream,
        text: node.text.clone(),
        test_id: node.attr("testid").map(str::to_string),
    })
}

/// Text of a nested element; an absent element reads as empty.
fn child_text(node: &ReportNode, tag: &str) -> String {
    node.child(tag).map(|c| c.text.clone()).unwrap_or_default()
}

/// Parse invariant-format decimal seconds (`"1.5"`, `"0.000123"`) into the
/// seconds value and its exact millisecond text.
///
/// Only plain `digits[.digits]` is accepted; signs, exponents and values whose
/// millisecond count overflows `f64` are rejected.
fn parse_seconds(value: &str) -> Option<(f64, String)> {
    let value = value.trim();
    let (int, frac) = value.split_once('.').unwrap_or((value, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int.is_empty() && frac.is_empty()) || !digits(int) || !digits(frac) {
        return None;
    }
    if value.ends_with('.') {
        return None;
    }
    let secs = value.parse::<f64>().ok()?;
    if !(secs * 1000.0).is_finite() {
        return None;
    }
    Some((secs, shift_millis(int, frac)))
}

/// `int.frac` seconds as milliseconds, in shortest decimal form.
fn shift_millis(int: &str, frac: &str) -> String {
    let split = frac.len().min(3);
    let mut whole = format!("{int}{}{}", &frac[..split], "0".repeat(3 - split));
    let rest = frac[split..].trim_end_matches('0');

    let leading = whole.len() - whole.trim_start_matches('0').len();
    whole.drain(..leading.min(whole.len() - 1));
    if rest.is_empty() {
        whole
    } else {
        format!("{whole}.{rest}")
    }
}
