/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use proptest::prelude::*;
use rdstation_leads::config::DEFAULT_BASE_URL;
use rdstation_leads::endpoints::{build_url, resolve_named, EndpointKind};
use rdstation_leads::models::is_blank;
use rdstation_leads::{LeadStatus, TrackingContext};
use serde_json::Value;

// Property: every URL hangs off the base URL and carries the version
proptest! {
    #[test]
    fn urls_start_with_base_and_version(
        token in "[a-zA-Z0-9]{1,32}",
        version in "[0-9]\\.[0-9]",
        kind in prop::sample::select(vec![
            EndpointKind::Generic,
            EndpointKind::Leads,
            EndpointKind::Conversions,
        ])
    ) {
        let url = build_url(DEFAULT_BASE_URL, &token, kind, &version);
        let prefix = format!("{}{}/", DEFAULT_BASE_URL, version);
        prop_assert!(url.starts_with(&prefix));
        // Only the generic endpoint embeds the private token
        prop_assert_eq!(url.contains(&format!("/services/{}/", token)), kind == EndpointKind::Generic);
    }

    #[test]
    fn unknown_kinds_resolve_to_empty(name in "[a-z]{1,12}") {
        prop_assume!(!["generic", "leads", "conversions"].contains(&name.as_str()));
        prop_assert_eq!(resolve_named(DEFAULT_BASE_URL, "abc", &name, "1.2"), "");
    }
}

// Property: only "won" and "lost" parse as statuses
proptest! {
    #[test]
    fn other_statuses_rejected(status in "\\PC*") {
        prop_assume!(status != "won" && status != "lost");
        let err = status.parse::<LeadStatus>().unwrap_err();
        prop_assert!(err.is_invalid_argument());
    }
}

// Property: non-empty strings other than "0" are never blank
proptest! {
    #[test]
    fn non_empty_strings_are_set(s in "\\PC+") {
        prop_assume!(s != "0");
        prop_assert!(!is_blank(&Value::String(s)));
    }

    #[test]
    fn non_zero_numbers_are_set(n in any::<i64>()) {
        prop_assume!(n != 0);
        prop_assert!(!is_blank(&Value::from(n)));
    }
}

// Property: cookie parsing should never panic
proptest! {
    #[test]
    fn cookie_header_parsing_never_panics(header in "\\PC*") {
        let _ = TrackingContext::from_cookie_header(&header);
    }

    #[test]
    fn rdtrk_id_round_trips(id in "[a-zA-Z0-9-]{1,36}") {
        let cookie = format!(r#"{{"id":"{}"}}"#, id);
        let ctx = TrackingContext::from_cookies(Some(&cookie), None);
        prop_assert_eq!(ctx.client_id, Some(id));
    }
}
