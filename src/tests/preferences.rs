use super::*;
use crate::test_utils::{program, ranked, setup};

#[test]
fn parse_full_document() {
    let prefs = Preferences::from_json(r#"{ "default_rank": 1.0, "ranks": { "V1": 5.0, "V2": 3 } }"#)
        .unwrap();
    assert_eq!(prefs.default_rank, Some(1.0));
    assert_eq!(prefs.ranks.get("V1"), Some(&5.0));
    assert_eq!(prefs.ranks.get("V2"), Some(&3.0));
}

#[test]
fn fields_are_optional() {
    let prefs = Preferences::from_json("{}").unwrap();
    assert_eq!(prefs, Preferences::default());
}

#[test]
fn unknown_field_is_rejected() {
    let err = Preferences::from_json(r#"{ "rank": {} }"#).unwrap_err();
    assert!(matches!(err, PreferenceError::Json(_)));
}

#[test]
fn non_numeric_rank_is_rejected() {
    let err = Preferences::from_json(r#"{ "ranks": { "V1": "high" } }"#).unwrap_err();
    assert!(matches!(err, PreferenceError::Json(_)));
}

#[test]
fn non_finite_rank_is_rejected() {
    let prefs = Preferences::default().with_rank("V1", f64::INFINITY);
    match prefs.validate() {
        Err(PreferenceError::NonFiniteRank(name)) => assert_eq!(name, "V1"),
        other => panic!("expected NonFiniteRank, got {:?}", other),
    }

    let prefs = Preferences {
        default_rank: Some(f64::NAN),
        ..Default::default()
    };
    assert!(prefs.validate().is_err());
}

#[test]
fn missing_file_is_io_error() {
    let err = Preferences::from_path("/nonexistent/prefs.json").unwrap_err();
    assert!(matches!(err, PreferenceError::Io(_)));
    assert!(err.to_string().contains("Cannot read preferences"));
}

#[test]
fn apply_sets_named_and_default_ranks() {
    let symbols = setup();
    let mut views = program(
        &symbols,
        "V1(x) :- p(x).\n\
         V2(x) :- p(x) @ 9.\n\
         V3(x) :- p(x).",
    )
    .views;
    let prefs = Preferences {
        default_rank: Some(1.0),
        ..Default::default()
    }
    .with_rank("V1", 5.0)
    .with_rank("V3", 3.0);

    let matched = prefs.apply(&mut views, &symbols, 0.0);
    assert_eq!(matched, 2);
    assert_eq!(views[0].rank(), Rank::new(5.0));
    // Named-or-default replaces the inline rank.
    assert_eq!(views[1].rank(), Rank::new(1.0));
    assert_eq!(views[2].rank(), Rank::new(3.0));
}

#[test]
fn apply_uses_fallback_without_document_default() {
    let symbols = setup();
    let mut views = vec![ranked(&symbols, "A(x) :- p(x)", 7.0)];
    let matched = Preferences::default().apply(&mut views, &symbols, 2.5);
    assert_eq!(matched, 0);
    assert_eq!(views[0].rank(), Rank::new(2.5));
}

#[test]
fn unknown_view_names_are_ignored() {
    let symbols = setup();
    let mut views = program(&symbols, "V1(x) :- p(x).").views;
    let prefs = Preferences::default()
        .with_rank("V1", 4.0)
        .with_rank("Nope", 8.0);
    assert_eq!(prefs.apply(&mut views, &symbols, 0.0), 1);
    assert_eq!(views[0].rank(), Rank::new(4.0));
}
