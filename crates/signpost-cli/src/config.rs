//! Resolving translator options at startup.
//!
//! Sources, lowest to highest precedence: the `TEAMCITY_VERSION` agent
//! variable, the `--config` YAML file, then flags and `SIGNPOST_*` variables.
//! Flags only switch options on.

use crate::cli::args::OutputArgs;
use anyhow::Context;
use signpost_core::Options;
use std::path::Path;

/// Set by TeamCity on every build agent.
pub const TEAMCITY_VERSION_ENV: &str = "TEAMCITY_VERSION";

pub fn resolve(args: &OutputArgs, teamcity_version: Option<&str>) -> anyhow::Result<Options> {
    let mut options = match &args.config {
        Some(path) => load(path)?,
        None => Options {
            build_messages: teamcity_version.is_some_and(|v| !v.is_empty()),
            ..Options::default()
        },
    };
    options.build_messages |= args.teamcity;
    options.labels |= args.labels;
    options.flow_ids |= args.flow_ids;
    Ok(options)
}

pub fn load(path: &Path) -> anyhow::Result<Options> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(Options::default());
    }
    serde_yaml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}
