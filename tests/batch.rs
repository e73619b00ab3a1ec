//! End-to-end batch runs against real files.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use stack_it_now::error::BatchError;
use stack_it_now::optimizer::GridPlanner;
use stack_it_now::runner::{run_batch, BatchOptions};

struct Fixture {
    _dir: TempDir,
    options: BatchOptions,
}

fn fixture(input_json: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("orders.json");
    fs::write(&input, input_json).unwrap();
    let options = BatchOptions {
        input,
        output: dir.path().join("java_output.txt"),
        plan_out: None,
    };
    Fixture { _dir: dir, options }
}

fn run(options: &BatchOptions) -> stack_it_now::runner::BatchSummary {
    run_batch(options, &GridPlanner::with_defaults()).unwrap()
}

fn output_of(options: &BatchOptions) -> String {
    fs::read_to_string(&options.output).unwrap()
}

fn not_placed_counts(output: &str) -> Vec<usize> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("not placed items="))
        .map(|n| n.parse().unwrap())
        .collect()
}

const SINGLE_BOX_ORDER: &str = r#"{"O1": {"properties": {"target": "euro-pallet"},
    "item_sequence": {"i1": {"length/mm": 100, "width/mm": 100, "height/mm": 100,
    "weight/kg": 5.0, "article": "box"}}}}"#;

#[test]
fn single_box_euro_pallet_order() {
    let fixture = fixture(SINGLE_BOX_ORDER);
    let summary = run(&fixture.options);

    assert_eq!(summary.orders, 1);
    assert_eq!(summary.loaded, 1);
    assert_eq!(summary.not_loaded, 0);

    let output = output_of(&fixture.options);
    assert!(output.contains("order id:O1"));
    assert!(output.contains("container 800x1200x2000 max weight 1500kg"));
    assert_eq!(not_placed_counts(&output), vec![0]);
    assert!(output.ends_with("====================\n"));
}

#[test]
fn unknown_target_rejects_every_item() {
    let fixture = fixture(
        r#"{"O1": {"properties": {"target": "pallet-unknown"},
            "item_sequence": {
                "i1": {"length/mm": 100, "width/mm": 100, "height/mm": 100, "weight/kg": 5.0, "article": "box"},
                "i2": {"length/mm": 200, "width/mm": 200, "height/mm": 200, "weight/kg": 2.0, "article": "crate"}
            }}}"#,
    );
    let summary = run(&fixture.options);

    assert_eq!(summary.loaded, 0);
    assert_eq!(summary.not_loaded, 2);

    let output = output_of(&fixture.options);
    assert!(output.contains("container 0x0x2000 max weight 1500kg"));
    assert_eq!(not_placed_counts(&output), vec![2]);
}

#[test]
fn empty_item_sequence_reports_zero_not_loaded() {
    let fixture = fixture(
        r#"{"O1": {"properties": {"target": "rollcontainer"}, "item_sequence": {}}}"#,
    );
    let summary = run(&fixture.options);

    assert_eq!(summary.orders, 1);
    assert_eq!(summary.loaded, 0);
    assert_eq!(summary.not_loaded, 0);
    assert_eq!(not_placed_counts(&output_of(&fixture.options)), vec![0]);
}

#[test]
fn every_order_appears_once_in_input_order() {
    let fixture = fixture(
        r#"{"Z9": {"properties": {"target": "euro-pallet"}, "item_sequence": {}},
            "A1": {"properties": {"target": "rollcontainer"}, "item_sequence": {}},
            "M5": {"properties": {"target": "euro-pallet"}, "item_sequence": {}}}"#,
    );
    run(&fixture.options);

    let output = output_of(&fixture.options);
    for id in ["Z9", "A1", "M5"] {
        assert_eq!(
            output.matches(&format!("order id:{id}\n")).count(),
            1,
            "order {id} must appear exactly once"
        );
    }
    let z9 = output.find("order id:Z9").unwrap();
    let a1 = output.find("order id:A1").unwrap();
    let m5 = output.find("order id:M5").unwrap();
    assert!(z9 < a1 && a1 < m5);
}

#[test]
fn second_run_appends_a_second_copy() {
    let fixture = fixture(SINGLE_BOX_ORDER);
    run(&fixture.options);
    run(&fixture.options);

    let output = output_of(&fixture.options);
    assert_eq!(output.matches("order id:O1").count(), 2);
}

#[test]
fn plan_document_lists_placed_items() {
    let mut fixture = fixture(SINGLE_BOX_ORDER);
    let plan_path: PathBuf = fixture._dir.path().join("packing_plans.json");
    fixture.options.plan_out = Some(plan_path.clone());

    run(&fixture.options);

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&plan_path).unwrap()).unwrap();
    let actions = doc["O1"].as_array().unwrap();
    assert_eq!(actions.len(), 1);

    let action = &actions[0];
    assert_eq!(action["item"]["article"], "box");
    let coords = action["flb_coordinates"].as_array().unwrap();
    assert_eq!(coords.len(), 3);
    let x = coords[0].as_i64().unwrap();
    let y = coords[1].as_i64().unwrap();
    let z = coords[2].as_i64().unwrap();
    assert!(x >= 0 && x + 100 <= 800);
    assert!(y >= 0 && y + 100 <= 1200);
    assert_eq!(z, 0);
    let orientation = action["orientation"].as_u64().unwrap();
    assert!(orientation == 0 || orientation == 1);
}

#[test]
fn field_error_aborts_but_keeps_partial_output() {
    let fixture = fixture(
        r#"{"O1": {"properties": {"target": "euro-pallet"}, "item_sequence": {}},
            "O2": {"properties": {"target": "euro-pallet"},
                "item_sequence": {"i1": {"length/mm": "wide", "width/mm": 1, "height/mm": 1,
                "weight/kg": 1.0, "article": "bad"}}}}"#,
    );

    let err = run_batch(&fixture.options, &GridPlanner::with_defaults()).unwrap_err();
    assert!(matches!(err, BatchError::Field { .. }));

    let output = output_of(&fixture.options);
    assert!(output.contains("order id:O1"));
    assert!(!output.contains("order id:O2"));
    // no trailing separator after an aborted batch
    assert!(!output.ends_with("====================\n"));
}

#[test]
fn missing_input_file_is_a_parse_class_error() {
    let dir = tempfile::tempdir().unwrap();
    let options = BatchOptions {
        input: dir.path().join("does-not-exist.json"),
        output: dir.path().join("java_output.txt"),
        plan_out: None,
    };

    let err = run_batch(&options, &GridPlanner::with_defaults()).unwrap_err();
    assert!(matches!(err, BatchError::InputUnreadable { .. }));
    assert!(!options.output.exists(), "no output without a parsed batch");
}
