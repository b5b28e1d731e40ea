use super::*;
use tempfile::tempdir;

const MARKER: &str = "Synthetic_CSH_pdf";

const SAMPLE_LOG: &str = "\
# furnace controller started
04:50:00 furnace setpoint 25 C
04:52:29 collect Synthetic_CSH_pdf_0001 T = 25.3 C
04:54:29 collect Synthetic_CSH_pdf_0002 T = 26.0 C
04:56:29 collect Synthetic_CSH_pdf_0003 T = 78.4 C
04:58:29 collect Synthetic_CSH_pdf_0004 T = 134.0 C
";

#[test]
fn test_time_hms_to_seconds() {
    assert_eq!(time_hms_to_seconds("04:54:29").unwrap(), 17669);
    assert_eq!(time_hms_to_seconds("00:00:00").unwrap(), 0);
    assert_eq!(time_hms_to_seconds("23:59:59").unwrap(), 86399);
    assert!(time_hms_to_seconds("25:00:00").is_err());
}

#[test]
fn test_round_to_tens() {
    assert_eq!(round_to_tens(134.0), 130);
    assert_eq!(round_to_tens(78.0), 80);
    assert_eq!(round_to_tens(25.3), 30);
    assert_eq!(round_to_tens(24.9), 20);
    assert_eq!(round_to_tens(199.6), 200);
    assert_eq!(round_to_tens(-14.0), -10);
}

#[test]
fn test_extract_time() {
    assert_eq!(extract_time("at 04:54:29 start"), Some("04:54:29"));
    assert_eq!(extract_time("04:54:29"), Some("04:54:29"));
    // word characters on either side break the match
    assert_eq!(extract_time("x04:54:29 y"), None);
    assert_eq!(extract_time("04:54:290"), None);
    assert_eq!(extract_time("run_4:54:29"), None);
    assert_eq!(extract_time("[12:00:01]"), Some("12:00:01"));
    assert_eq!(extract_time("short"), None);
}

#[test]
fn test_extract_temperature() {
    assert_eq!(extract_temperature("collect a T = 25.3 C"), Some("25.3"));
    assert_eq!(extract_temperature("T is 100"), Some("100"));
    assert_eq!(extract_temperature("collect a T ="), None);
    assert_eq!(extract_temperature("Temperature = 25"), None);
}

#[test]
fn test_record_line_requires_text_after_marker() {
    assert!(is_record_line("x Synthetic_CSH_pdf_1 T = 1", MARKER));
    assert!(!is_record_line("x Synthetic_CSH_pdf", MARKER));
    assert!(!is_record_line("no marker here", MARKER));
}

#[test]
fn test_parse_log() {
    let log = parse_log(SAMPLE_LOG, MARKER).unwrap();

    assert_eq!(log.len(), 4);
    assert_eq!(log.timestamps(), vec![17549, 17669, 17789, 17909]);
    assert_eq!(log.temperatures(), vec![25.3, 26.0, 78.4, 134.0]);
    assert_eq!(log.rounded_temperatures(), vec![30, 30, 80, 130]);
    assert_eq!(log.samples()[1].rounded_temperature(), 30);
}

#[test]
fn test_parse_log_without_records_is_empty() {
    let log = parse_log("nothing to see\n", MARKER).unwrap();
    assert!(log.is_empty());
}

#[test]
fn test_missing_temperature_is_parse_error() {
    let text = "04:52:29 collect Synthetic_CSH_pdf_0001 T =\n";
    let err = parse_log(text, MARKER).unwrap_err();

    assert!(matches!(err, LogError::MissingTemperature { line: 1 }));
    assert!(err.is_parse_error());
}

#[test]
fn test_missing_timestamp_reports_line() {
    let text = "header\ncollect Synthetic_CSH_pdf_0001 T = 30 C\n";
    let err = parse_log(text, MARKER).unwrap_err();

    assert!(matches!(err, LogError::MissingTimestamp { .. }));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_invalid_values() {
    let err = parse_log("99:99:99 Synthetic_CSH_pdf_1 T = 30\n", MARKER).unwrap_err();
    assert!(matches!(err, LogError::InvalidTimestamp { .. }));

    let err = parse_log("01:00:00 Synthetic_CSH_pdf_1 T = hot\n", MARKER).unwrap_err();
    assert!(matches!(err, LogError::InvalidTemperature { ref value, .. } if value == "hot"));
}

#[test]
fn test_non_finite_temperatures_rejected() {
    for token in ["nan", "NaN", "inf", "-inf", "infinity"] {
        let content = format!("10:00:00 collect Synthetic_CSH_pdf_0001 T = {token} C\n");
        let err = parse_log(&content, MARKER).unwrap_err();
        assert!(
            matches!(err, LogError::InvalidTemperature { line: 1, ref value } if value == token),
            "{token} should be rejected"
        );
    }

    let content = "10:00:00 collect Synthetic_CSH_pdf_0001 T = 25.0 C\n\
                   10:02:00 collect Synthetic_CSH_pdf_0002 T = inf C\n";
    let err = parse_log(content, MARKER).unwrap_err();
    assert!(matches!(err, LogError::InvalidTemperature { line: 2, .. }));
}

#[test]
fn test_read_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");
    std::fs::write(&path, SAMPLE_LOG).unwrap();

    let log = read_log(&path, MARKER).unwrap();
    assert_eq!(log.len(), 4);
}

#[test]
fn test_read_missing_log() {
    let err = read_log("/nonexistent/log.txt", MARKER).unwrap_err();
    assert!(matches!(err, LogError::IoError { .. }));
    assert!(!err.is_parse_error());
}
