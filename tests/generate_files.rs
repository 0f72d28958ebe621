use std::path::PathBuf;

use enumgen::definitions::{load_batch, load_file};
use enumgen::sink::write_artifacts;
use enumgen::{BatchError, BatchMode, RenderOptions};
use pretty_assertions::assert_eq;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn loads_fixture_definitions() {
    let enums = load_file(&fixture_path("palette.json")).expect("should parse palette.json");
    assert_eq!(enums.len(), 2);
    assert_eq!(enums[0].qualified_name(), "gfx::palette::Color");
    assert_eq!(enums[1].file_stem(), "level");
}

#[test]
fn generates_and_writes_fixture_batch() {
    let batch = load_batch([fixture_path("palette.json")]).unwrap();
    let report = batch.generate(&RenderOptions::default(), BatchMode::FailFast).unwrap();
    assert_eq!(report.artifacts.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    for artifacts in &report.artifacts {
        write_artifacts(dir.path(), artifacts).unwrap();
    }

    let mut files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    assert_eq!(files, vec!["Color.cpp", "Color.hpp", "level.cpp", "level.hpp"]);

    let level_header = std::fs::read_to_string(dir.path().join("level.hpp")).unwrap();
    assert!(level_header.contains("enum class Level : std::uint8_t"));
    assert!(level_header.contains("std::vector<Level> all_levels();"));
    let level_source = std::fs::read_to_string(dir.path().join("level.cpp")).unwrap();
    assert!(level_source.starts_with("// Generated by enumgen. Do not edit.\n\n#include \"level.hpp\"\n"));
}

#[test]
fn failing_definition_does_not_block_others_when_keeping_going() {
    let batch = load_batch([fixture_path("broken.json")]).unwrap();

    let report = batch.generate(&RenderOptions::default(), BatchMode::KeepGoing).unwrap();
    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].name, "Fine");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "Mixed");

    let err = batch.generate(&RenderOptions::default(), BatchMode::FailFast).unwrap_err();
    assert!(matches!(err, BatchError::Generate(ref e) if e.name == "Mixed"));
}

#[test]
fn files_from_several_inputs_share_one_batch() {
    let batch = load_batch([fixture_path("palette.json"), fixture_path("broken.json")]).unwrap();
    let names: Vec<_> = batch.definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Color", "Level", "Fine", "Mixed"]);
}
