use chrono::{NaiveDate, Timelike};
use pretty_assertions::assert_eq;
use snapcal::temporal::{resolve_instant, split_time_range};
use snapcal::RuleBasedTemporalParser;

fn parser() -> RuleBasedTemporalParser {
    RuleBasedTemporalParser::new(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
}

#[test]
fn test_instant_carries_configured_zone_not_server_zone() {
    let instant =
        resolve_instant("05/12/2025", "19:00", chrono_tz::America::Los_Angeles, &parser())
            .unwrap();
    // May 12 is inside DST, so the Pacific offset is -07:00; the point is
    // that it is the configured zone's offset, never the server's.
    assert_eq!(instant.offset().local_minus_utc(), -7 * 3600);
    assert_eq!(instant.hour(), 19);
    assert!(instant.to_rfc3339().ends_with("-07:00"));
}

#[test]
fn test_both_endpoints_of_a_display_range_resolve() {
    let (start_text, end_text) = split_time_range("7:00 PM – 8:00 PM");
    let tz = chrono_tz::America::Los_Angeles;

    let start = resolve_instant("5/12/2025", &start_text, tz, &parser()).unwrap();
    let end = resolve_instant("5/12/2025", &end_text.unwrap(), tz, &parser()).unwrap();

    assert_eq!(start.hour(), 19);
    assert_eq!(end.hour(), 20);
    assert_eq!(end.signed_duration_since(start).num_minutes(), 60);
}

#[test]
fn test_standard_time_offset_in_winter() {
    let instant =
        resolve_instant("12/12/2025", "10:00", chrono_tz::America::Los_Angeles, &parser())
            .unwrap();
    assert_eq!(instant.offset().local_minus_utc(), -8 * 3600);
}

#[test]
fn test_other_zones_follow_configuration() {
    let instant = resolve_instant("05/12/2025", "19:00", chrono_tz::Asia::Tokyo, &parser()).unwrap();
    assert_eq!(instant.offset().local_minus_utc(), 9 * 3600);

    let instant = resolve_instant("05/12/2025", "19:00", chrono_tz::UTC, &parser()).unwrap();
    assert_eq!(instant.offset().local_minus_utc(), 0);
}

#[test]
fn test_gibberish_never_resolves() {
    assert!(resolve_instant("whenever", "whenever", chrono_tz::UTC, &parser()).is_err());
}
