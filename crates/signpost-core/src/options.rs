use serde::Deserialize;

/// Translator settings, fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Emit TeamCity service messages.
    pub build_messages: bool,
    /// Print `***** <name>` when a test starts.
    pub labels: bool,
    /// Attach `flowId` to service messages of events that carry an id.
    pub flow_ids: bool,
}

impl Options {
    /// Service messages on, everything else off.
    pub fn teamcity() -> Self {
        Self {
            build_messages: true,
            ..Self::default()
        }
    }

    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_flow_ids(mut self, flow_ids: bool) -> Self {
        self.flow_ids = flow_ids;
        self
    }
}
