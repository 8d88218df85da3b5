use std::io::Cursor;

use lifecycle_trigger::lifecycle::{
    BatchImportError, BatchImporter, DecisionEngine, DocumentConfiguration, FinalAction,
    IdentityId, LayeredConfiguration, ProcessKind,
};
use serde_json::json;

const EXPORT: &str = "\
identity,display_name,process,is_new,previous_state,previous_correlated,previous_links,state,correlated,links
E-001,Ada Lovelace,joiner,true,,,,,false,
E-002,Grace Hopper,joiner,false,NEEDED,false,,NEEDED,false,
E-003,Alan Turing,mover,false,,true,ad:aturing,,true,ad:aturing;hr:3003
E-004,Katherine Johnson,leaver,false,PROCESSED,true,ad:kjohnson,PROCESSED,false,ad:kjohnson
E-005,Edsger Dijkstra,rehire,false,,true,,,true,
";

#[test]
fn batch_applies_policy_to_every_identity() {
    let engine = DecisionEngine::new(DocumentConfiguration::from_value(json!({
        "business-processes": {
            "joiner": {
                "auto-join-new-empty-identities": true,
                "require-correlated": true
            },
            "leaver": { "require-correlated": true }
        }
    })));

    let report = BatchImporter::from_reader(Cursor::new(EXPORT), &engine).expect("batch runs");

    let actions: Vec<_> = report
        .decisions
        .iter()
        .map(|decision| (decision.identity.0.as_str(), decision.action))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("E-001", FinalAction::Run),
            ("E-002", FinalAction::SkipAndMarkSkipped),
            ("E-003", FinalAction::DeferToFilters { optional: false }),
            ("E-004", FinalAction::Skip),
            ("E-005", FinalAction::DeferToFilters { optional: false }),
        ]
    );
    assert_eq!(report.decisions[4].process, ProcessKind::Unknown);
    assert_eq!(report.count(FinalAction::DeferToFilters { optional: false }), 2);
    assert_eq!(
        report.marked_skipped().collect::<Vec<_>>(),
        vec![&IdentityId("E-002".to_string())]
    );
}

#[test]
fn layered_overrides_change_batch_outcome() {
    let overrides = DocumentConfiguration::from_value(json!({
        "business-processes": { "joiner": { "require-correlated": false } }
    }));
    let document = DocumentConfiguration::from_value(json!({
        "business-processes": { "joiner": { "require-correlated": true } }
    }));
    let engine = DecisionEngine::new(LayeredConfiguration::new(overrides, document));

    let report = BatchImporter::from_reader(Cursor::new(EXPORT), &engine).expect("batch runs");

    assert_eq!(
        report.decisions[1].action,
        FinalAction::DeferToFilters { optional: true }
    );
    assert_eq!(report.marked_skipped().count(), 0);
}

#[test]
fn missing_file_is_an_io_error() {
    let engine = DecisionEngine::new(DocumentConfiguration::empty());

    let err = BatchImporter::from_path("does/not/exist.csv", &engine).expect_err("no file");

    assert!(matches!(err, BatchImportError::Io(_)));
}
