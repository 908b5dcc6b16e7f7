#![no_main]

use libfuzzer_sys::fuzz_target;
use sheet_harness::{GestureScript, replay};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Malformed scripts must fail cleanly; valid ones must replay without
    // panicking and report as many commands as the host received.
    let Ok(script) = GestureScript::from_json(text) else {
        return;
    };
    if let Ok(report) = replay(&script) {
        let animate_calls = report
            .host_calls
            .iter()
            .filter(|call| call.name() == "animate")
            .count();
        assert_eq!(report.commands, animate_calls);
    }
});
