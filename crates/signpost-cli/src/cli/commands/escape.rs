use super::super::args::EscapeArgs;
use crate::exit_codes::SUCCESS;
use signpost_core::escape;

/// Print each value escaped for a service-message field, one per line.
pub fn run(args: EscapeArgs) -> anyhow::Result<i32> {
    for value in &args.values {
        println!("{}", escape(value));
    }
    Ok(SUCCESS)
}
