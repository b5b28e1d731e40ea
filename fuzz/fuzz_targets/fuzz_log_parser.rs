#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing must fail with an error, never panic
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(log) = pdfpeak::log_file::parse_log(text, "Synthetic_CSH_pdf") {
            let _ = pdfpeak::segments::select_analytes(&log, &Default::default());
        }
    }
});
