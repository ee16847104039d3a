#![no_main]

use libfuzzer_sys::fuzz_target;
use signpost_core::{Options, ReportReader, Translator};

fuzz_target!(|data: &[u8]| {
    let options = Options::teamcity().with_labels(true).with_flow_ids(true);
    let mut translator = Translator::new(options, std::io::sink(), std::io::sink());
    for node in ReportReader::new(data) {
        let Ok(node) = node else { break };
        let _ = translator.handle_node(&node);
    }
});
