#![no_main]

use libfuzzer_sys::fuzz_target;
use signpost_core::escape;

fuzz_target!(|data: &str| {
    let escaped = escape(data);
    assert!(!escaped.contains('\n') && !escaped.contains('\r'));
    assert!(escaped.len() >= data.len());
});
