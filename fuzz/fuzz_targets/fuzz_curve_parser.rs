#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok((_, intensity)) = pdfpeak::curve::parse_curve(text) {
            let peaks = pdfpeak::curve::locate_peaks(&intensity, [0, usize::MAX]);
            for &peak in peaks.iter() {
                let _ = pdfpeak::integrals::integrate_peak_area(&intensity, peak);
            }
        }
    }
});
