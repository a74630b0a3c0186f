//! Edge case tests for chatsift
//!
//! These tests cover boundary conditions of the line grammar and the
//! aggregator that are awkward to express as unit tests.

use chatsift::config::AggregatorConfig;
use chatsift::core::aggregate::{LogAggregator, SourceText, aggregate};
use chatsift::core::filter::{FilterSpecification, RadiusFilter, apply_filters};
use chatsift::{ChatLogRecord, FailureReason, parse_line};
use chrono::{Datelike, TimeZone, Timelike, Utc};

// =========================================================================
// Timestamps
// =========================================================================

#[test]
fn test_two_digit_year_always_2000s() {
    let record = parse_line("[01-01-99 00:00:00.000] Old: party").unwrap();
    assert_eq!(record.timestamp.year(), 2099);

    let record = parse_line("[01-01-00 00:00:00.000] New: millennium").unwrap();
    assert_eq!(record.timestamp.year(), 2000);
}

#[test]
fn test_millisecond_precision() {
    let record = parse_line("[31-12-24 23:59:59.999] Late: bye").unwrap();
    assert_eq!(record.timestamp.nanosecond(), 999_000_000);
    assert_eq!(record.timestamp.day(), 31);
}

#[test]
fn test_timestamp_shape_is_strict() {
    for stamp in [
        "1-11-25 21:29:30.123",
        "10-11-2025 21:29:30.123",
        "10-11-25 21:29:30",
        "10-11-25 21:29:30.12",
        "10-11-25 21:29:30.1234",
        "10/11/25 21:29:30.123",
        "10-11-25T21:29:30.123",
        "10-13-25 21:29:30.123",
        "10-11-25 24:00:00.000",
        "29-02-25 12:00:00.000",
        "",
    ] {
        let line = format!("[{stamp}] Rota: hi");
        assert_eq!(
            parse_line(&line),
            Err(FailureReason::InvalidTimestamp),
            "stamp: {stamp:?}"
        );
    }

    // 2024 is a leap year
    assert!(parse_line("[29-02-24 12:00:00.000] Rota: hi").is_ok());
}

// =========================================================================
// Grammar shapes
// =========================================================================

#[test]
fn test_check_order() {
    // Bad timestamp wins over an empty user and bad coordinates.
    assert_eq!(
        parse_line("[99-99-99 99:99:99.999]  @ x,y,z: hi"),
        Err(FailureReason::InvalidTimestamp)
    );
    // Empty user wins over bad coordinates.
    assert_eq!(
        parse_line("[10-11-25 21:29:30.123]  @ x,y,z: hi"),
        Err(FailureReason::EmptyUser)
    );
}

#[test]
fn test_coordinate_shapes() {
    let ok = [
        ("1,2,3", (1.0, 2.0, 3)),
        ("-1.5, 2.25 ,-3", (-1.5, 2.25, -3)),
        ("0,0,0", (0.0, 0.0, 0)),
    ];
    for (clause, (lat, lng, floor)) in ok {
        let record = parse_line(&format!("[10-11-25 21:29:30.123] Rota @ {clause}: hi")).unwrap();
        assert_eq!(record.latitude(), Some(lat), "{clause}");
        assert_eq!(record.longitude(), Some(lng), "{clause}");
        assert_eq!(record.floor(), Some(floor), "{clause}");
    }

    for clause in ["1,2", "1,2,3,4", "1,2,1.5", "a,2,3", "1,,3", "NaN,1,1", "inf,1,1", ""] {
        assert_eq!(
            parse_line(&format!("[10-11-25 21:29:30.123] Rota @ {clause}: hi")),
            Err(FailureReason::InvalidCoordinate),
            "clause: {clause:?}"
        );
    }
}

#[test]
fn test_floor_zero_is_present() {
    let record = parse_line("[10-11-25 21:29:30.123] Rota @ 5,5,0: hi").unwrap();
    assert_eq!(record.floor(), Some(0));
}

#[test]
fn test_empty_nickname_is_absent() {
    let record = parse_line("[10-11-25 21:29:30.123] Rota (): hi").unwrap();
    assert_eq!(record.user, "Rota");
    assert!(record.nickname.is_none());
}

#[test]
fn test_language_and_type_variants() {
    let record = parse_line("[10-11-25 21:29:30.123] Rota: [en] hello").unwrap();
    assert_eq!(record.language(), Some("en"));
    assert!(record.message_type().is_none());
    assert_eq!(record.message, "hello");

    let record = parse_line("[10-11-25 21:29:30.123] Rota: /me waves").unwrap();
    assert!(record.language().is_none());
    assert_eq!(record.message_type(), Some("/me"));
    assert_eq!(record.message, "waves");

    let record = parse_line("[10-11-25 21:29:30.123] Rota @ 1,2,3: [en] /say").unwrap();
    assert_eq!(record.message_type(), Some("/say"));
    assert_eq!(record.message, "");

    let record = parse_line("[10-11-25 21:29:30.123] Rota:").unwrap();
    assert_eq!(record.message, "");

    // A lone slash or a tag with spaces is just message text.
    let record = parse_line("[10-11-25 21:29:30.123] Rota: / not a command").unwrap();
    assert!(record.message_type().is_none());
    assert_eq!(record.message, "/ not a command");

    let record = parse_line("[10-11-25 21:29:30.123] Rota: [not a tag] hi").unwrap();
    assert!(record.language().is_none());
    assert_eq!(record.message, "[not a tag] hi");
}

#[test]
fn test_unicode_fields() {
    let record =
        parse_line("[10-11-25 21:29:30.123] Иван Петров (Ваня) @ 1,2,0: [ru] /say Привет, мир 🌍")
            .unwrap();
    assert_eq!(record.user, "Иван Петров");
    assert_eq!(record.nickname(), Some("Ваня"));
    assert_eq!(record.message, "Привет, мир 🌍");
}

#[test]
fn test_never_panics_on_odd_input() {
    for line in [
        "[",
        "]",
        "[]",
        "[]:",
        "[] (:",
        "[10-11-25 21:29:30.123]",
        "[10-11-25 21:29:30.123] @",
        "[10-11-25 21:29:30.123] @:",
        "[10-11-25 21:29:30.123] ((((: x",
        "[10-11-25 21:29:30.123] a @ b @ c: x",
        "\u{0}\u{1}\u{2}",
        "[é-ñ-ü ü:ü:ü.üüü] x: y",
        "[10-11-25 21:29:30.123] 👨‍👩‍👧 (🎉): [🌍] /🔥 🔥",
    ] {
        let _ = parse_line(line);
    }
}

#[test]
fn test_very_long_message() {
    let message = "x".repeat(64 * 1024);
    let record = parse_line(&format!("[10-11-25 21:29:30.123] Rota: {message}")).unwrap();
    assert_eq!(record.message.len(), 64 * 1024);
}

// =========================================================================
// Aggregation
// =========================================================================

#[test]
fn test_crlf_and_bom_input() {
    let text = "\u{feff}[10-11-25 21:29:30.123] Rota: one\r\n\r\n[10-11-25 21:29:31.000] Rota: two\r\n";
    let result = aggregate(&[SourceText::new("windows.log", text)]);
    assert!(result.failures().is_empty());
    let messages: Vec<_> = result.records().iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, ["one", "two"]);
}

#[test]
fn test_line_numbers_count_blank_lines() {
    let text = "\n\n   \nbroken\n\t\nalso broken";
    let result = aggregate(&[SourceText::new("gaps.log", text)]);
    let numbers: Vec<_> = result.failures().iter().map(|f| f.line_number).collect();
    assert_eq!(numbers, [4, 6]);
    assert_eq!(result.summary().lines_seen, 2);
}

#[test]
fn test_all_blank_and_empty_files() {
    let result = aggregate(&[
        SourceText::new("empty.log", ""),
        SourceText::new("blank.log", "\n \n\t\n"),
    ]);
    assert!(result.is_empty());
    assert!(result.failures().is_empty());
    assert_eq!(result.summary().files, 2);
    assert_eq!(result.summary().success_rate(), 0.0);
    assert!(result.time_span().is_none());
}

#[test]
fn test_binary_noise_is_all_failures() {
    let noise: String = (0u8..=255)
        .map(char::from)
        .filter(|c| *c != '\n' && *c != '\r')
        .collect::<String>()
        .repeat(4);
    let text = format!("{noise}\n{noise}\n");
    let result = aggregate(&[SourceText::new("noise.bin", &text)]);
    assert!(result.records().is_empty());
    assert_eq!(result.failures().len(), 2);
}

#[test]
fn test_duplicates_across_files_are_kept() {
    let line = "[10-11-25 21:29:30.123] Rota: same";
    let result = aggregate(&[SourceText::new("a.log", line), SourceText::new("b.log", line)]);
    assert_eq!(result.records().len(), 2);
    assert_eq!(result.records()[0], result.records()[1]);
}

#[test]
fn test_failure_cap_keeps_counts() {
    let text = "bad\n".repeat(50);
    let aggregator =
        LogAggregator::with_config(AggregatorConfig::new().with_max_failures_kept(5));
    let result = aggregator.aggregate(&[SourceText::new("bad.log", &text)]);
    assert_eq!(result.failures().len(), 5);
    assert_eq!(result.summary().failures, 50);
    assert_eq!(result.summary().count(FailureReason::MalformedStructure), 50);
}

// =========================================================================
// Filtering
// =========================================================================

#[test]
fn test_radius_zero_at_exact_center() {
    let ts = Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap();
    let records = vec![
        ChatLogRecord::new(ts, "Here", "x").with_location(10.0, 20.0, 0),
        ChatLogRecord::new(ts, "Near", "x").with_location(10.0, 20.000_001, 0),
        ChatLogRecord::new(ts, "Nowhere", "x"),
    ];
    let spec = FilterSpecification::new().with_radius(RadiusFilter::new(10.0, 20.0, 0.0));
    let visible = apply_filters(&records, &spec).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].user, "Here");
}

#[test]
fn test_search_unicode_case_folding() {
    let ts = Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap();
    let records = vec![ChatLogRecord::new(ts, "Ivan", "ПРИВЕТ всем")];
    let spec = FilterSpecification::new().with_search("привет");
    assert_eq!(apply_filters(&records, &spec).unwrap().len(), 1);
}
