//! Shared test utilities for entscore-cli integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Get a Command for the entscore binary, isolated from user config.
///
/// Points `ENTSCORE_CONFIG` at a file that does not exist so the built-in
/// defaults apply, and clears the other `ENTSCORE_*` variables.
#[allow(deprecated)]
pub fn entscore_cmd() -> Command {
    let mut cmd = Command::cargo_bin("entscore").expect("entscore binary should exist");
    cmd.env("ENTSCORE_CONFIG", "/nonexistent/entscore/config.yaml")
        .env_remove("ENTSCORE_INDEX")
        .env_remove("ENTSCORE_EXTERNAL_IDF")
        .env_remove("ENTSCORE_VERBOSE")
        .env("NO_COLOR", "1");
    cmd
}

/// Write a JSON dump and import it into `<dir>/index`.
pub fn import_dump(dir: &Path, dump: &str) -> PathBuf {
    let dump_path = dir.join("dump.json");
    fs::write(&dump_path, dump).expect("write dump");

    let index_dir = dir.join("index");
    entscore_cmd()
        .arg("import")
        .arg(&dump_path)
        .arg("--out")
        .arg(&index_dir)
        .assert()
        .success();
    index_dir
}

/// One document of average length; `fever` scores 1.1875 against it.
pub const SINGLE_DOC_DUMP: &str = r#"{
    "documentLengths": {"d1": 100},
    "termFrequencies": {"fever": {"d1": 2}},
    "termIdf": {"fever": 0.5}
}"#;

/// Three documents, one term and one entity.
pub const SMALL_CORPUS_DUMP: &str = r#"{
    "documentLengths": {"a": 80, "b": 120, "c": 100},
    "termFrequencies": {"fever": {"a": 1, "b": 4, "c": 2}},
    "entityFrequencies": {"wuhan": {"b": 1, "c": 3}},
    "termIdf": {"fever": 4.0},
    "entityIdf": {"wuhan": 1.0}
}"#;
