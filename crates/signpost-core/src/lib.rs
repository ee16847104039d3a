//! Translate test progress reports into console output and TeamCity service
//! messages.
//!
//! A test framework reports its progress as small XML elements, one per
//! lifecycle moment:
//!
//! ```text
//! <start-suite name="Calc"/>
//! <start-test name="Adds"/>
//! <test-case name="Adds" result="Passed" time="0.015"/>
//! <test-suite name="Calc" result="Passed"/>
//! ```
//!
//! [`Translator`] turns each one into zero or more output lines:
//!
//! ```
//! use signpost_core::{Options, Translator};
//!
//! let mut t = Translator::new(Options::teamcity(), Vec::new(), Vec::new());
//! t.handle_report(r#"<test-case name="Adds" result="Passed" time="1.5"/>"#)?;
//! let (out, _) = t.into_inner();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "##teamcity[testFinished name='Adds' duration='1500']\n"
//! );
//! # Ok::<(), signpost_core::ReportError>(())
//! ```

pub mod error;
pub mod escape;
pub mod event;
pub mod format;
pub mod message;
pub mod options;
pub mod translator;
pub mod xml;

pub use error::{ReportError, Result};
pub use escape::escape;
pub use event::{Event, Outcome, OutputStream};
pub use format::{render, Channel, Emission};
pub use message::ServiceMessage;
pub use options::Options;
pub use translator::{ReportListener, Translator};
pub use xml::{parse_fragment, ReportNode, ReportReader};
