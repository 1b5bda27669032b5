// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Integration tests for redaction, batch labelling and restoration

use pii_redaction::{
    restore, Entity, EntityFilter, Filter, FilterOverrides, FilterSlot, Mapping, MalformedLabel,
    PatternFilter, RedactionConfig, RedactionError, Redactor,
};

const PROFILE: &str = "My name is Ralph
My location is Boston
My email address is user@example.com
My credit card numbers are 4242-4242-4242-4242 and 4141414141414141
My social security number is 123-45-6789
My phone number is 555-555-5555
";

/// Redactor whose model always reports the given entities
fn redactor_with_entities(entities: Vec<Entity>) -> Redactor {
    let config = RedactionConfig::default().with_model(move |_: &str| entities.clone());
    Redactor::new(config)
}

fn ralph_and_boston() -> Redactor {
    redactor_with_entities(vec![
        Entity::new("Ralph", "person", 0.5),
        Entity::new("Boston", "location", 0.5),
    ])
}

fn ip_address_regex() -> Filter {
    PatternFilter::compile("IP_ADDRESS", &[r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b"])
        .unwrap()
        .into()
}

#[test]
fn test_filter_profile() {
    let result = ralph_and_boston()
        .filter(PROFILE, &FilterOverrides::new(), &[])
        .unwrap();

    assert_eq!(
        result.output,
        "My name is [PERSON_1]
My location is [LOCATION_1]
My email address is [EMAIL_1]
My credit card numbers are [CREDIT_CARD_1] and [CREDIT_CARD_2]
My social security number is [SSN_1]
My phone number is [PHONE_NUMBER_1]
"
    );
    assert_eq!(
        result.mapping,
        Mapping::from([
            ("CREDIT_CARD_1", "4242-4242-4242-4242"),
            ("CREDIT_CARD_2", "4141414141414141"),
            ("EMAIL_1", "user@example.com"),
            ("PHONE_NUMBER_1", "555-555-5555"),
            ("SSN_1", "123-45-6789"),
            ("PERSON_1", "Ralph"),
            ("LOCATION_1", "Boston"),
        ])
    );
    assert_eq!(result.input, PROFILE);
    assert!(result.sensitive());
    assert!(!result.safe());
}

#[test]
fn test_profile_categories() {
    let result = ralph_and_boston()
        .filter(PROFILE, &FilterOverrides::new(), &[])
        .unwrap();
    let categories = result.categories();

    assert_eq!(categories.values_for("email"), vec!["user@example.com"]);
    assert_eq!(categories.values_for("person"), vec!["Ralph"]);
    assert_eq!(categories.values_for("location"), vec!["Boston"]);
    assert_eq!(
        categories.values_for("credit_card"),
        vec!["4242-4242-4242-4242", "4141414141414141"]
    );
    assert_eq!(categories.values_for("ssn"), vec!["123-45-6789"]);
    assert_eq!(categories.values_for("phone_number"), vec!["555-555-5555"]);
    assert!(categories.any_for("EMAIL"));
    assert_eq!(
        categories.sub_mapping_for("phone_number"),
        Mapping::from([("PHONE_NUMBER_1", "555-555-5555")])
    );
}

#[test]
fn test_categories_without_matches_still_listed() {
    let result = Redactor::default()
        .filter("", &FilterOverrides::new(), &[])
        .unwrap();
    let categories = result.categories();

    assert_eq!(
        categories.types(),
        vec!["CREDIT_CARD", "EMAIL", "PHONE_NUMBER", "SSN", "PERSON", "LOCATION"]
    );
    for label in categories.types() {
        assert!(!categories.any_for(&label));
        assert!(categories.values_for(&label).is_empty());
        assert!(categories.sub_mapping_for(&label).is_empty());
    }
}

#[test]
fn test_relabelled_slot_is_queryable() {
    let overrides = FilterOverrides::new().set(
        "email_filter",
        PatternFilter::compile("E_MAIL_ADDRESS", &[r"user\[at\]example\.com"]).unwrap(),
    );
    let redactor = Redactor::default();
    let result = redactor
        .filter("user[at]example.com", &overrides, &[])
        .unwrap();

    assert_eq!(result.output, "[E_MAIL_ADDRESS_1]");
    assert_eq!(
        result.categories().values_for("e_mail_address"),
        vec!["user[at]example.com"]
    );

    let mut config = RedactionConfig::default();
    config.set_slot(
        FilterSlot::Email,
        Some(PatternFilter::compile("E_MAIL_ADDRESS", &[r"x"]).unwrap().into()),
    );
    assert_eq!(
        result.categories().values_for_slot(&config, FilterSlot::Email),
        vec!["user[at]example.com"]
    );
}

#[test]
fn test_override_regex_filter() {
    let overrides = FilterOverrides::new().set(
        "email_filter",
        PatternFilter::compile("EMAIL_ADDRESS", &[r"user\[at\]example\.com"]).unwrap(),
    );
    let input = PROFILE.replace("user@example.com", "user[at]example.com");
    let result = ralph_and_boston().filter(&input, &overrides, &[]).unwrap();

    assert!(result.output.contains("My email address is [EMAIL_ADDRESS_1]"));
    assert_eq!(result.mapping.get("EMAIL_ADDRESS_1"), Some("user[at]example.com"));
    assert!(!result.mapping.contains_token("EMAIL_1"));
}

#[test]
fn test_override_entity_filter_threshold() {
    let redactor = redactor_with_entities(vec![
        Entity::new("Ralph", "person", 0.25),
        Entity::new("Boston", "location", 0.5),
    ]);
    let overrides = FilterOverrides::new().set(
        "people_filter",
        EntityFilter::new("NAME", "person").with_min_confidence(0.25),
    );

    let result = redactor.filter(PROFILE, &overrides, &[]).unwrap();
    assert!(result.output.starts_with("My name is [NAME_1]\n"));
    assert_eq!(result.mapping.get("NAME_1"), Some("Ralph"));

    let default = redactor.filter(PROFILE, &FilterOverrides::new(), &[]).unwrap();
    assert!(default.output.starts_with("My name is Ralph\n"));
}

#[test]
fn test_disable_filter() {
    let overrides = FilterOverrides::new().disable("email_filter");
    let result = ralph_and_boston().filter(PROFILE, &overrides, &[]).unwrap();

    assert!(result.output.contains("My email address is user@example.com"));
    assert!(!result.categories().any_for("email"));
    assert_eq!(result.mapping.len(), 6);
}

#[test]
fn test_custom_filters_run_last() {
    let input = format!("{PROFILE}My IP address is 192.168.1.1\n");
    let custom = vec![ip_address_regex()];

    let result = ralph_and_boston()
        .filter(&input, &FilterOverrides::new(), &custom)
        .unwrap();

    assert!(result.output.ends_with("My IP address is [IP_ADDRESS_1]\n"));
    assert_eq!(result.mapping.tokens().last(), Some("IP_ADDRESS_1"));
}

#[test]
fn test_custom_entity_filter() {
    let redactor = redactor_with_entities(vec![Entity::new("192.168.1.1", "ip_address", 0.5)]);
    let custom = vec![Filter::from(EntityFilter::new("IP_ADDRESS", "ip_address"))];

    let result = redactor
        .filter("192.168.1.1", &FilterOverrides::new(), &custom)
        .unwrap();

    assert_eq!(result.output, "[IP_ADDRESS_1]");
    assert_eq!(result.mapping, Mapping::from([("IP_ADDRESS_1", "192.168.1.1")]));
}

#[test]
fn test_case_preserving_label() {
    let overrides = FilterOverrides::new().set(
        "email_filter",
        PatternFilter::compile("email", &[r"user\[at\]example\.com"]).unwrap(),
    );
    let result = Redactor::default()
        .filter("user[at]example.com", &overrides, &[])
        .unwrap();

    assert_eq!(result.output, "[email_1]");
    assert_eq!(result.mapping, Mapping::from([("email_1", "user[at]example.com")]));
}

#[test]
fn test_min_confidence_from_config() {
    let mut config = RedactionConfig::default()
        .with_model(|_: &str| vec![Entity::new("Ralph", "person", 0.5)]);
    config.min_confidence_score = 0.9;

    let result = Redactor::new(config)
        .filter("Ralph", &FilterOverrides::new(), &[])
        .unwrap();

    assert_eq!(result.output, "Ralph");
    assert!(result.mapping.is_empty());
}

#[test]
fn test_duplicates_share_token() {
    let result = Redactor::default()
        .filter(
            "user_1@example.com user_1@example.com",
            &FilterOverrides::new(),
            &[],
        )
        .unwrap();

    assert_eq!(result.output, "[EMAIL_1] [EMAIL_1]");
    assert_eq!(result.mapping, Mapping::from([("EMAIL_1", "user_1@example.com")]));
}

#[test]
fn test_invalid_override_key() {
    let overrides = FilterOverrides::new().set("ip_address_filter", ip_address_regex());

    let filter_err = Redactor::default()
        .filter("192.168.1.1", &overrides, &[])
        .unwrap_err();
    assert!(matches!(
        filter_err,
        RedactionError::InvalidFilterKey { ref key, .. } if key == "ip_address_filter"
    ));

    let scan_err = Redactor::default()
        .scan("192.168.1.1", &overrides, &[])
        .unwrap_err();
    assert!(matches!(scan_err, RedactionError::InvalidFilterKey { .. }));
}

#[test]
fn test_malformed_labels() {
    for label in ["_EMAIL_ADDRESS", "EMAIL__ADDRESS", "EMAIL1ADDRESS", "EMAIL*ADDRESS"] {
        let overrides = FilterOverrides::new().set(
            "email_filter",
            PatternFilter::compile(label, &[r"user\[at\]example\.com"]).unwrap(),
        );
        let err = Redactor::default().filter("", &overrides, &[]).unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("Unsupported label. Labels must contain only letters and underscores: '{label}'")
        );
    }

    let overrides = FilterOverrides::new().set(
        "email_filter",
        PatternFilter::compile(" ", &[r"user\[at\]example\.com"]).unwrap(),
    );
    let err = Redactor::default().filter("", &overrides, &[]).unwrap_err();
    assert!(matches!(err, RedactionError::MalformedLabel(MalformedLabel::Blank)));
    assert_eq!(err.to_string(), "You must provide a label.");
}

#[test]
fn test_scan_does_not_modify_text() {
    let redactor = ralph_and_boston();
    let scanned = redactor.scan(PROFILE, &FilterOverrides::new(), &[]).unwrap();
    let filtered = redactor.filter(PROFILE, &FilterOverrides::new(), &[]).unwrap();

    assert!(scanned.sensitive());
    assert_eq!(scanned.mapping, filtered.mapping);
    assert_eq!(scanned.categories().values_for("ssn"), vec!["123-45-6789"]);
}

#[test]
fn test_batch_shared_tokens() {
    let result = Redactor::default()
        .filter_all(
            &["Contact john@test.com", "Email john@test.com again"],
            &FilterOverrides::new(),
            &[],
        )
        .unwrap();

    assert_eq!(result.mapping, Mapping::from([("EMAIL_1", "john@test.com")]));
    assert_eq!(result.items[0].output, "Contact [EMAIL_1]");
    assert_eq!(result.items[1].output, "Email [EMAIL_1] again");
}

#[test]
fn test_batch_messages() {
    let messages = [
        "My email is ralph@example.com, and my credit card number is 4242424242424242",
        "I'll email ruby@example.com, and send her my new credit card number, which is 4141414141414141",
        "Please charge 4242424242424242 and email ruby@example.com and ralph@example.com",
        "This sentence contains no sensitive information",
    ];

    let result = Redactor::default()
        .filter_all(&messages, &FilterOverrides::new(), &[])
        .unwrap();

    assert_eq!(
        result.mapping,
        Mapping::from([
            ("CREDIT_CARD_1", "4242424242424242"),
            ("EMAIL_1", "ralph@example.com"),
            ("CREDIT_CARD_2", "4141414141414141"),
            ("EMAIL_2", "ruby@example.com"),
        ])
    );

    let inputs: Vec<_> = result.items.iter().map(|item| item.input.as_str()).collect();
    assert_eq!(inputs, messages);

    let outputs: Vec<_> = result.items.iter().map(|item| item.output.as_str()).collect();
    assert_eq!(
        outputs,
        vec![
            "My email is [EMAIL_1], and my credit card number is [CREDIT_CARD_1]",
            "I'll email [EMAIL_2], and send her my new credit card number, which is [CREDIT_CARD_2]",
            "Please charge [CREDIT_CARD_1] and email [EMAIL_2] and [EMAIL_1]",
            "This sentence contains no sensitive information",
        ]
    );

    assert_eq!(
        result.items[0].mapping,
        Mapping::from([
            ("CREDIT_CARD_1", "4242424242424242"),
            ("EMAIL_1", "ralph@example.com"),
        ])
    );
    assert_eq!(
        result.items[1].mapping,
        Mapping::from([
            ("CREDIT_CARD_2", "4141414141414141"),
            ("EMAIL_2", "ruby@example.com"),
        ])
    );
    assert_eq!(
        result.items[2].mapping,
        Mapping::from([
            ("CREDIT_CARD_1", "4242424242424242"),
            ("EMAIL_1", "ralph@example.com"),
            ("EMAIL_2", "ruby@example.com"),
        ])
    );
    assert!(result.items[3].mapping.is_empty());

    let sensitive: Vec<_> = result.items.iter().map(|item| item.sensitive()).collect();
    assert_eq!(sensitive, vec![true, true, true, false]);
    assert!(result.items[3].safe());
}

#[test]
fn test_batch_redacts_values_found_elsewhere() {
    // The filter only matches a standalone ID, but the value is redacted
    // wherever it appears in the batch
    let custom = vec![Filter::from(
        PatternFilter::compile("ACCOUNT", &[r"\bID\d+\b"]).unwrap(),
    )];
    let result = Redactor::default()
        .filter_all(&["account ID42", "legacy xID42", "nothing"], &FilterOverrides::new(), &custom)
        .unwrap();

    assert_eq!(result.mapping, Mapping::from([("ACCOUNT_1", "ID42")]));
    assert_eq!(result.items[1].output, "legacy x[ACCOUNT_1]");
    assert_eq!(result.items[1].mapping, Mapping::from([("ACCOUNT_1", "ID42")]));
    assert_eq!(result.items[2].output, "nothing");
    assert!(result.items[2].safe());
}

#[test]
fn test_batch_categories() {
    let result = Redactor::default()
        .filter_all(&["user@example.com", ""], &FilterOverrides::new(), &[])
        .unwrap();

    assert_eq!(result.items[0].categories().values_for("email"), vec!["user@example.com"]);
    assert!(!result.items[1].categories().any_for("email"));
    assert!(result.items[1].categories().types().contains(&"EMAIL".to_string()));
    assert!(result.sensitive());
}

#[test]
fn test_restore_round_trip() {
    let redactor = ralph_and_boston();
    let filtered = redactor.filter(PROFILE, &FilterOverrides::new(), &[]).unwrap();
    let restored = redactor.restore(&filtered.output, &filtered.mapping);

    assert_eq!(restored.output, PROFILE);
    assert_eq!(restored.restored.len(), filtered.mapping.len());
    assert!(restored.unrestored.is_empty());
}

#[test]
fn test_restore_wrong_case() {
    let mapping = Mapping::from([("PERSON_1", "Ralph")]);
    let result = restore("Hello, [person_1]!", &mapping);

    assert_eq!(result.output, "Hello, [person_1]!");
    assert_eq!(result.unrestored, vec!["[person_1]"]);
    assert!(result.restored.is_empty());
}

#[test]
fn test_restore_unmapped_placeholder() {
    let mapping = Mapping::from([("EMAIL_1", "ralph@example.com")]);
    let result = restore("Hello, [PERSON_1]! I'll email you at [EMAIL_1].", &mapping);

    assert_eq!(result.restored, vec!["[EMAIL_1]"]);
    assert_eq!(result.unrestored, vec!["[PERSON_1]"]);
}

#[test]
fn test_config_from_json() {
    let config = RedactionConfig::from_json(
        r#"{
            "filters": {"email_filter": null},
            "custom_filters": [
                {"kind": "regex", "label": "IP_ADDRESS", "patterns": ["\\b\\d{1,3}(?:\\.\\d{1,3}){3}\\b"]}
            ]
        }"#,
    )
    .unwrap();

    let result = Redactor::new(config)
        .filter("user@example.com from 10.0.0.1", &FilterOverrides::new(), &[])
        .unwrap();

    assert_eq!(result.output, "user@example.com from [IP_ADDRESS_1]");
}

#[test]
fn test_result_serializes_to_json() {
    let result = Redactor::default()
        .filter("user@example.com", &FilterOverrides::new(), &[])
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "input": "user@example.com",
            "output": "[EMAIL_1]",
            "mapping": {"EMAIL_1": "user@example.com"}
        })
    );
}

#[test]
fn test_large_text_performance() {
    let mut text = String::new();
    for i in 0..1000 {
        text.push_str(&format!(
            "User {}: SSN 123-45-{:04}, Email user{}@example.com\n",
            i, i, i
        ));
    }

    let start = std::time::Instant::now();
    let result = Redactor::default()
        .scan(&text, &FilterOverrides::new(), &[])
        .unwrap();
    let duration = start.elapsed();

    assert_eq!(result.categories().values_for("ssn").len(), 1000);
    assert_eq!(result.categories().values_for("email").len(), 1000);
    println!("Scanned {} bytes in {:?}", text.len(), duration);
}
