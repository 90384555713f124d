use std::fs;
use std::path::Path;

use anyhow::Result;
use fileutils_core::{BatchRunner, FsExecutor, OperationKind, OperationRecord};
use fileutils_test_support::scratch_dir;
use serde_json::json;

fn manifest_dir() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn mixed_batch_isolates_the_failing_move() -> Result<()> {
    let scratch = scratch_dir(manifest_dir(), "fileutils-batch-")?;
    let root = scratch.path();
    let dir = root.join("a");
    let records = vec![
        OperationRecord::create_dir(&dir),
        OperationRecord::create_file(dir.join("f.txt"), "hi"),
        OperationRecord::rename(dir.join("f.txt"), dir.join("g.txt")),
        OperationRecord::delete(dir.join("g.txt")),
        OperationRecord::move_entry(root.join("nope"), dir.join("z")),
    ];

    let summary = BatchRunner::new(FsExecutor::default())
        .with_run_id("integration")
        .run(&records);

    assert_eq!(summary.total_operations(), 5);
    assert_eq!(summary.successful_operations(), 4);
    assert_eq!(summary.failed_operations(), 1);
    let flags: Vec<bool> = summary.results().iter().map(|r| r.success).collect();
    assert_eq!(flags, vec![true, true, true, true, false]);
    let operations: Vec<&str> = summary
        .results()
        .iter()
        .filter_map(|r| r.operation.as_deref())
        .collect();
    assert_eq!(operations, vec!["create_dir", "create_file", "rename", "delete", "move"]);

    let failure = summary.results()[4].error.as_deref().unwrap_or_default();
    assert!(failure.contains(&root.join("nope").display().to_string()));

    assert!(dir.is_dir());
    assert!(!dir.join("f.txt").exists());
    assert!(!dir.join("g.txt").exists());
    assert!(!dir.join("z").exists());
    Ok(())
}

#[test]
fn unknown_kind_does_not_block_subsequent_records() -> Result<()> {
    let scratch = scratch_dir(manifest_dir(), "fileutils-batch-")?;
    let root = scratch.path();
    let records = vec![
        OperationRecord::new(OperationKind::parse("frobnicate"), root.join("weird")),
        OperationRecord::create_file(root.join("after.txt"), "still runs"),
    ];

    let summary = BatchRunner::new(FsExecutor::default()).run(&records);

    assert_eq!(summary.failed_operations(), 1);
    assert_eq!(summary.successful_operations(), 1);
    let first = &summary.results()[0];
    assert!(first.error.as_deref().is_some_and(|e| e.contains("frobnicate")));
    assert!(!root.join("weird").exists());
    assert_eq!(fs::read_to_string(root.join("after.txt"))?, "still runs");
    Ok(())
}

#[test]
fn delete_then_recreate_respects_input_order() -> Result<()> {
    let scratch = scratch_dir(manifest_dir(), "fileutils-batch-")?;
    let target = scratch.path().join("cycle.txt");
    fs::write(&target, "old")?;
    let records = vec![
        OperationRecord::delete(&target),
        OperationRecord::create_file(&target, "new"),
        OperationRecord::delete(&target),
        OperationRecord::delete(&target),
    ];

    let summary = BatchRunner::new(FsExecutor::default()).run(&records);

    let flags: Vec<bool> = summary.results().iter().map(|r| r.success).collect();
    assert_eq!(flags, vec![true, true, true, false]);
    assert!(!target.exists());
    Ok(())
}

#[test]
fn summary_serialises_to_the_result_shape() -> Result<()> {
    let scratch = scratch_dir(manifest_dir(), "fileutils-batch-")?;
    let dir = scratch.path().join("made");
    let summary =
        BatchRunner::new(FsExecutor::default()).run(&[OperationRecord::create_dir(&dir)]);

    let value = serde_json::to_value(&summary)?;
    assert_eq!(
        value,
        json!({
            "total_operations": 1,
            "successful_operations": 1,
            "failed_operations": 0,
            "results": [{
                "operation": "create_dir",
                "destination": dir.display().to_string(),
                "success": true
            }]
        })
    );
    Ok(())
}
