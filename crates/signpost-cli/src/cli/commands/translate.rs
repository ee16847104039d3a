use super::super::args::TranslateArgs;
use crate::config::{self, TEAMCITY_VERSION_ENV};
use crate::exit_codes::{REPORT_REJECTED, SUCCESS};
use anyhow::Context;
use signpost_core::{ReportError, ReportReader, Translator};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Default)]
struct Tally {
    translated: usize,
    rejected: usize,
}

/// Whether to keep reading after one report.
enum Flow {
    Continue,
    Stop(i32),
}

pub fn run(args: TranslateArgs) -> anyhow::Result<i32> {
    let teamcity_version = std::env::var(TEAMCITY_VERSION_ENV).ok();
    let options = config::resolve(&args.output, teamcity_version.as_deref())?;
    tracing::debug!(?options, "resolved options");

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut translator = Translator::new(options, stdout.lock(), stderr.lock());
    let mut tally = Tally::default();

    if let Some(report) = &args.report {
        let result = translator.handle_report(report);
        return match tally.record(1, result, args.strict)? {
            Flow::Stop(code) => Ok(code),
            Flow::Continue => Ok(tally.finish()),
        };
    }

    let source = open_input(args.input.as_deref())?;
    let mut reports = ReportReader::new(source);
    while let Some(node) = reports.next() {
        // a reader error is not counted in reports_read
        let index = reports.reports_read() + usize::from(node.is_err());
        let result = node.and_then(|node| translator.handle_node(&node));
        if let Flow::Stop(code) = tally.record(index, result, args.strict)? {
            return Ok(code);
        }
    }
    Ok(tally.finish())
}

fn open_input(input: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
    match input {
        None => Ok(Box::new(io::stdin().lock())),
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

impl Tally {
    fn record(
        &mut self,
        index: usize,
        result: Result<usize, ReportError>,
        strict: bool,
    ) -> anyhow::Result<Flow> {
        match result {
            Ok(_) => {
                self.translated += 1;
                Ok(Flow::Continue)
            }
            Err(e) if e.is_rejected_report() => {
                self.rejected += 1;
                tracing::warn!(report = index, error = %e, "skipping report");
                if strict {
                    Ok(Flow::Stop(REPORT_REJECTED))
                } else {
                    Ok(Flow::Continue)
                }
            }
            Err(e) => Err(e).context("failed to write translated output"),
        }
    }

    fn finish(self) -> i32 {
        tracing::info!(
            translated = self.translated,
            rejected = self.rejected,
            "translation finished"
        );
        SUCCESS
    }
}
