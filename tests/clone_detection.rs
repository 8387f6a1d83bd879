//! End-to-end scenarios for the clone detection pipeline.

use serde_json::{json, Value};

use cloneseek_rs::detectors::clones::{find_all_clones, remove_duplicate_clones, PairReport};
use cloneseek_rs::{CloneAnalyzer, CloneConfig, NodeId, Pdg, PdgBuilder};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `Program` controlling one `ExpressionStatement` over a literal.
fn literal_program(source: &str, raw: &str, value: Value) -> Pdg {
    let mut builder = PdgBuilder::new("Program").source(source);
    let root = builder.root();
    let stmt = builder.add_child(root, "ExpressionStatement").unwrap();
    let literal = builder.add_child(stmt, "Literal").unwrap();
    builder.set_literal(literal, raw, value).unwrap();
    builder.add_control_dep(root, stmt).unwrap();
    builder.build()
}

/// `Program` controlling one `x = <literal>` assignment.
fn assignment_program(source: &str, raw: &str, value: Value) -> Pdg {
    let mut builder = PdgBuilder::new("Program").source(source);
    let root = builder.root();
    let stmt = builder.add_child(root, "ExpressionStatement").unwrap();
    let assign = builder.add_child(stmt, "AssignmentExpression").unwrap();
    builder.add_child(assign, "Identifier").unwrap();
    let literal = builder.add_child(assign, "Literal").unwrap();
    builder.set_literal(literal, raw, value).unwrap();
    builder.add_control_dep(root, stmt).unwrap();
    builder.build()
}

/// `if (a) b;` / `while (a) b;`: a guard statement over an identifier test
/// with a controlled expression body.
fn guarded_body_program(source: &str, guard_kind: &str) -> Pdg {
    let mut builder = PdgBuilder::new("Program").source(source);
    let root = builder.root();
    let guard = builder.add_child(root, guard_kind).unwrap();
    builder.add_child(guard, "Identifier").unwrap();
    let body = builder.add_child(guard, "ExpressionStatement").unwrap();
    builder.add_child(body, "Identifier").unwrap();
    builder.add_control_dep(root, guard).unwrap();
    builder.add_control_dep(guard, body).unwrap();
    builder.build()
}

#[test]
fn identity_pair_is_fully_cloned() {
    init_tracing();
    let benign = literal_program("benign.js", "1", json!(1));
    let malicious = literal_program("malicious.js", "1", json!(1));

    let store = find_all_clones(&benign, &malicious);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).benign(), &[benign.root()]);
    assert_eq!(store.get(0).malicious(), &[malicious.root()]);

    let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
    assert_eq!(report.benign, "benign.js");
    assert_eq!(report.malicious, "malicious.js");
    assert_eq!(
        report.similar,
        vec![vec![
            "Program".to_string(),
            "ExpressionStatement".to_string(),
            "Literal".to_string()
        ]]
    );
    assert!(report.dissimilar.is_empty());
    assert!(report.pb_tokens.is_empty());
    assert_eq!(report.malicious_coverage.cloned, 2);
    assert_eq!(report.malicious_coverage.total, 2);
    assert!(report.is_complete());
    assert!((report.malicious_ratio() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn literal_only_mismatch_is_still_a_clone() {
    // `x = 1;` against `x = 2;`: same category, so no token report.
    let benign = assignment_program("benign.js", "1", json!(1));
    let malicious = assignment_program("malicious.js", "2", json!(2));

    let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
    assert!(report.is_complete());
    assert!(report.dissimilar.is_empty());
    assert!(report.pb_tokens.is_empty());
}

#[test]
fn literal_category_mismatch_is_reported() {
    // `x = 'a';` against `x = 1;`: the clone survives, the tokens differ.
    let benign = assignment_program("benign.js", "'a'", json!("a"));
    let malicious = assignment_program("malicious.js", "1", json!(1));

    let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
    assert!(report.is_complete());
    assert_eq!(
        report.pb_tokens,
        vec![["Numeric".to_string(), "String".to_string()]]
    );
}

#[test]
fn guard_kind_mismatch_leaves_the_guard_uncovered() {
    // `if (a) b;` against `while (a) b;`: only the bodies are clones.
    let benign = guarded_body_program("benign.js", "IfStatement");
    let malicious = guarded_body_program("malicious.js", "WhileStatement");

    let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
    assert!(report.malicious_ratio() < 1.0);
    assert!(!report.is_complete());
    assert!(report
        .dissimilar
        .contains(&"WhileStatement".to_string()));
    assert_eq!(
        report.similar,
        vec![vec![
            "ExpressionStatement".to_string(),
            "Identifier".to_string()
        ]]
    );
    assert_eq!(report.malicious_coverage.cloned, 2);
    assert_eq!(report.malicious_coverage.total, 4);
}

#[test]
fn repeated_discoveries_collapse_to_one_group() {
    // Two identical statements per side: every anchor attempt climbs to the
    // same Program pair, so discovery reports the same group four times.
    fn two_statement_program(source: &str) -> Pdg {
        let mut builder = PdgBuilder::new("Program").source(source);
        let root = builder.root();
        for _ in 0..2 {
            let stmt = builder.add_child(root, "ExpressionStatement").unwrap();
            builder.add_child(stmt, "Identifier").unwrap();
            builder.add_control_dep(root, stmt).unwrap();
        }
        builder.build()
    }

    let benign = two_statement_program("benign.js");
    let malicious = two_statement_program("malicious.js");

    let mut store = find_all_clones(&benign, &malicious);
    assert_eq!(store.len(), 4);

    let mut report = PairReport::new("benign.js", "malicious.js");
    remove_duplicate_clones(&mut store, &benign, &malicious, &mut report);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).benign(), &[benign.root()]);

    let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
    assert!(report.is_complete());
    assert!(report.dissimilar.is_empty());
}

#[test]
fn leaf_statement_clone() {
    fn break_program(source: &str) -> Pdg {
        let mut builder = PdgBuilder::new("Program").source(source);
        let root = builder.root();
        let brk = builder.add_child(root, "BreakStatement").unwrap();
        builder.add_control_dep(root, brk).unwrap();
        builder.build()
    }

    let benign = break_program("benign.js");
    let malicious = break_program("malicious.js");

    let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
    assert!(report.is_complete());
    assert_eq!(report.malicious_coverage.cloned, 1);
    assert_eq!(report.malicious_coverage.total, 1);
    assert!(report.pb_tokens.is_empty());
    assert!(report.dissimilar.is_empty());
}

#[test]
fn disjoint_programs_share_nothing() {
    let benign = literal_program("benign.js", "1", json!(1));

    let mut builder = PdgBuilder::new("Program").source("malicious.js");
    let root = builder.root();
    let stmt = builder.add_child(root, "ReturnStatement").unwrap();
    builder.add_child(stmt, "Identifier").unwrap();
    builder.add_control_dep(root, stmt).unwrap();
    let malicious = builder.build();

    let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
    assert_eq!(report.malicious_coverage.cloned, 0);
    assert!(report.similar.is_empty());
    assert_eq!(
        report.dissimilar,
        vec![
            "Program".to_string(),
            "ReturnStatement".to_string(),
            "Identifier".to_string()
        ]
    );
}

#[test]
fn benchmarks_follow_the_configuration() {
    init_tracing();
    let benign = literal_program("benign.js", "1", json!(1));
    let malicious = literal_program("malicious.js", "1", json!(1));

    let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
    let benchmarks = report.benchmarks.expect("benchmarks recorded by default");
    assert!(benchmarks.clones_detected >= 0.0);
    assert!(benchmarks.clones_selected >= 0.0);

    let analyzer = CloneAnalyzer::new(CloneConfig {
        record_benchmarks: false,
    });
    let report = analyzer.analyze_pair(&benign, &malicious);
    assert!(report.benchmarks.is_none());
}

#[test]
fn report_serialises_with_reference_field_names() {
    let benign = literal_program("benign.js", "1", json!(1));
    let malicious = literal_program("malicious.js", "1", json!(1));

    let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
    let value = serde_json::to_value(&report).unwrap();

    assert!(value.get("%benign").is_some());
    assert!(value.get("%malicious").is_some());
    assert!(value.get("similar").is_some());
    assert!(value.get("dissimilar").is_some());
    assert!(value.get("pb_tokens").is_some());
    let benchmarks = value.get("benchmarks").unwrap();
    assert!(benchmarks.get("Clones detected").is_some());
    assert!(benchmarks.get("Clones selected").is_some());
}

#[test]
fn node_ids_stay_within_their_own_graph() {
    // Matching a PDG against its own clone produces pairs of distinct
    // references even when the ids coincide numerically.
    let benign = literal_program("same.js", "1", json!(1));
    let malicious = benign.clone();

    let store = find_all_clones(&benign, &malicious);
    assert_eq!(store.len(), 1);
    let group = store.get(0);
    let pairs: Vec<(NodeId, NodeId)> = group
        .benign()
        .iter()
        .copied()
        .zip(group.malicious().iter().copied())
        .collect();
    assert!(!pairs.is_empty());
}
