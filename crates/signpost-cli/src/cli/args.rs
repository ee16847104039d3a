use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "signpost",
    version,
    about = "Translate test progress reports into console output and TeamCity service messages"
)]
pub struct Cli {
    /// Diagnostic log filter, e.g. `debug` (overrides RUST_LOG)
    #[arg(long, global = true, env = "SIGNPOST_LOG")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Translate progress reports from a file, stdin, or the command line
    Translate(TranslateArgs),
    /// Print values escaped for a service-message field
    Escape(EscapeArgs),
    /// Print the signpost version
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TranslateArgs {
    /// Stream of XML reports to translate ("-" or omitted: stdin)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Translate this single report instead of reading a stream
    #[arg(long, conflicts_with = "input")]
    pub report: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Stop at the first malformed or incomplete report (exit 1)
    #[arg(long)]
    pub strict: bool,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Emit TeamCity service messages (default: on when TEAMCITY_VERSION is set)
    #[arg(long, env = "SIGNPOST_TEAMCITY")]
    pub teamcity: bool,

    /// Print `***** <name>` as each test starts
    #[arg(long, env = "SIGNPOST_LABELS")]
    pub labels: bool,

    /// Tag service messages with the report id as flowId
    #[arg(long, env = "SIGNPOST_FLOW_IDS")]
    pub flow_ids: bool,

    /// YAML file with `build_messages`, `labels` and `flow_ids` keys
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EscapeArgs {
    #[arg(required = true)]
    pub values: Vec<String>,
}
