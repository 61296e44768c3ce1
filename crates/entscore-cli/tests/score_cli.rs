//! Integration tests for `entscore import`, `score` and `rank`.

mod common;

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use common::{entscore_cmd, import_dump, SINGLE_DOC_DUMP, SMALL_CORPUS_DUMP};

fn json_score(output: &[u8]) -> f64 {
    let value: serde_json::Value = serde_json::from_slice(output).expect("valid JSON");
    value["score"].as_f64().expect("score field")
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn test_import_writes_snapshot() {
    let temp = TempDir::new().expect("create temp dir");
    let dump = temp.path().join("dump.json");
    fs::write(&dump, SMALL_CORPUS_DUMP).expect("write dump");
    let index = temp.path().join("index");

    entscore_cmd()
        .arg("import")
        .arg(&dump)
        .arg("--out")
        .arg(&index)
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok] Imported 3 documents"));

    assert!(index.join("tables.bin").exists());
    assert!(index.join("meta.json").exists());
}

#[test]
fn test_import_rejects_negative_idf() {
    let temp = TempDir::new().expect("create temp dir");
    let dump = temp.path().join("dump.json");
    fs::write(
        &dump,
        r#"{"documentLengths": {"d1": 10}, "termIdf": {"fever": -1.0}}"#,
    )
    .expect("write dump");

    entscore_cmd()
        .arg("import")
        .arg(&dump)
        .arg("--out")
        .arg(temp.path().join("index"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("[err]"))
        .stderr(predicate::str::contains("fever"));
}

// ============================================================================
// Score
// ============================================================================

#[test]
fn test_score_worked_example() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SINGLE_DOC_DUMP);

    entscore_cmd()
        .arg("--index")
        .arg(&index)
        .args(["score", "--doc", "d1", "-t", "fever"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1.1875"))
        .stdout(predicate::str::contains("Entity IDF: corpus"));
}

#[test]
fn test_score_json_output() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SINGLE_DOC_DUMP);

    let output = entscore_cmd()
        .arg("--index")
        .arg(&index)
        .args(["score", "--doc", "d1", "-t", "fever", "--json"])
        .output()
        .expect("run entscore");

    assert!(output.status.success());
    assert!((json_score(&output.stdout) - 1.1875).abs() < 1e-9);
}

#[test]
fn test_score_unknown_token_is_zero() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SINGLE_DOC_DUMP);

    entscore_cmd()
        .arg("--index")
        .arg(&index)
        .args(["score", "--doc", "d1", "-t", "nothing", "-e", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0.0000"));
}

#[test]
fn test_score_missing_document_fails() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SINGLE_DOC_DUMP);

    entscore_cmd()
        .arg("--index")
        .arg(&index)
        .args(["score", "--doc", "ghost", "-t", "fever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("`ghost` not found"))
        .stderr(predicate::str::contains("Hint:"));
}

#[test]
fn test_score_without_snapshot_fails() {
    let temp = TempDir::new().expect("create temp dir");

    entscore_cmd()
        .arg("--index")
        .arg(temp.path().join("empty"))
        .args(["score", "--doc", "d1", "-t", "fever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No frequency tables found"));
}

#[test]
fn test_blended_entity_idf_changes_score() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SMALL_CORPUS_DUMP);
    let external = temp.path().join("en-idf.txt");
    fs::write(&external, "# token idf\nwuhan 7.0\n").expect("write external idf");

    let corpus = entscore_cmd()
        .arg("--index")
        .arg(&index)
        .args(["score", "--doc", "c", "-e", "wuhan", "--json"])
        .output()
        .expect("run entscore");
    let blended = entscore_cmd()
        .arg("--index")
        .arg(&index)
        .arg("--external-idf")
        .arg(&external)
        .args(["score", "--doc", "c", "-e", "wuhan", "--blend", "--json"])
        .output()
        .expect("run entscore");

    assert!(corpus.status.success());
    assert!(blended.status.success());

    // 7 / 14 * max_idf 4.0 = 2.0, sqrt(1.0 * 2.0) > 1.0
    let corpus = json_score(&corpus.stdout);
    let blended = json_score(&blended.stdout);
    assert!((blended / corpus - 2.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn test_blend_without_external_table_warns() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SMALL_CORPUS_DUMP);

    entscore_cmd()
        .arg("--index")
        .arg(&index)
        .args(["score", "--doc", "c", "-e", "wuhan", "--blend"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[warn]"));
}

#[test]
fn test_invalid_config_fails() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SINGLE_DOC_DUMP);
    let config = temp.path().join("config.yaml");
    fs::write(&config, "scoring:\n  b: 1.5\n").expect("write config");

    entscore_cmd()
        .env("ENTSCORE_CONFIG", &config)
        .arg("--index")
        .arg(&index)
        .args(["score", "--doc", "d1", "-t", "fever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_config_params_apply() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SINGLE_DOC_DUMP);
    let config = temp.path().join("config.yaml");
    // Plain BM25: 0.5 * 4.4 / 3.2 = 0.6875
    fs::write(&config, "scoring:\n  delta: 0.0\n").expect("write config");

    entscore_cmd()
        .env("ENTSCORE_CONFIG", &config)
        .arg("--index")
        .arg(&index)
        .args(["score", "--doc", "d1", "-t", "fever"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0.6875"));
}

// ============================================================================
// Rank
// ============================================================================

#[test]
fn test_rank_orders_best_first() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SMALL_CORPUS_DUMP);

    let output = entscore_cmd()
        .arg("--index")
        .arg(&index)
        .args([
            "rank", "--doc", "a", "--doc", "b", "--doc", "c", "-t", "fever", "-e", "wuhan",
            "--json",
        ])
        .output()
        .expect("run entscore");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let results = value["results"].as_array().expect("results array");
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["rank"], 1);

    let scores: Vec<f64> = results
        .iter()
        .map(|r| r["score"].as_f64().expect("score"))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_rank_top_k_and_skip_missing() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SMALL_CORPUS_DUMP);

    entscore_cmd()
        .arg("--index")
        .arg(&index)
        .args([
            "rank", "--doc", "a", "--doc", "ghost", "--doc", "b", "-t", "fever", "--top-k", "1",
            "--skip-missing",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("RANK"))
        .stdout(predicate::str::contains("b"))
        .stderr(predicate::str::contains("[skip] ghost"));
}

#[test]
fn test_rank_missing_document_fails_without_skip() {
    let temp = TempDir::new().expect("create temp dir");
    let index = import_dump(temp.path(), SMALL_CORPUS_DUMP);

    entscore_cmd()
        .arg("--index")
        .arg(&index)
        .args(["rank", "--doc", "a", "--doc", "ghost", "-t", "fever", "--sequential"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}
