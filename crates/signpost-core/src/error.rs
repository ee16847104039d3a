//! Error types for report translation.

/// Why a single report could not be translated.
///
/// Every variant except [`ReportError::Io`] is scoped to one report: the
/// translator emits nothing for it and the next report is unaffected.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The input is not a single well-formed XML element.
    #[error("malformed report: {reason}")]
    Malformed { reason: String },

    /// A recognized event lacks an attribute or nested element it requires.
    #[error("<{tag}> report is missing required {field}")]
    MissingField {
        tag: &'static str,
        field: &'static str,
    },

    /// A required field is present but cannot be interpreted.
    #[error("<{tag}> report has invalid {field}: {value:?}")]
    InvalidField {
        tag: &'static str,
        field: &'static str,
        value: String,
    },

    /// Writing to an output sink failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// True when the error concerns the report itself rather than the sinks.
    ///
    /// Hosts skip rejected reports and keep going; sink failures are fatal.
    pub fn is_rejected_report(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

impl From<quick_xml::Error> for ReportError {
    fn from(e: quick_xml::Error) -> Self {
        Self::malformed(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ReportError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::malformed(format!("bad attribute: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
