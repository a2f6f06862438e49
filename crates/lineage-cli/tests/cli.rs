use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FAMILY_CSV: &str = "\
Name,Parent,Birth,Death,Location,Gender,Spouse,Occupation,Generation,Highlight
Jacob Asher,,1900,1970,\"Haifa, Israel\",Male,Rivka,Baker,,yes
Rivka,,1905,1980,Haifa,Female,Jacob Asher,,,
Leah Asher,Jacob Asher,1925.0,,Tel Aviv,Female,,Teacher,,
Dan Asher,Jacob Asher,1928,2001,New York USA,Male,,,,
Eli Asher,Leah Asher,1950,,Tel Aviv,,,,,
,Jacob Asher,1960,,,,,,,
";

fn lineage(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lineage").unwrap();
    cmd.env_remove("LINEAGE_TREE")
        .env_remove("RUST_LOG")
        .env("LINEAGE_CONFIG", dir.path().join("config.toml"))
        .arg("--data-dir")
        .arg(dir.path().join("data"));
    cmd
}

fn import_family(dir: &TempDir) {
    let csv = dir.path().join("family.csv");
    std::fs::write(&csv, FAMILY_CSV).unwrap();
    lineage(dir)
        .args(["-t", "asher", "import"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 5 persons"))
        .stdout(predicate::str::contains("row 6: missing name"));
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_tree_create_and_list() {
    let dir = TempDir::new().unwrap();

    lineage(&dir)
        .args(["tree", "create", "asher", "--description", "Asher family"])
        .assert()
        .success();
    lineage(&dir)
        .args(["tree", "create", "asher"])
        .assert()
        .failure();
    lineage(&dir)
        .args(["tree", "create", "bad name!"])
        .assert()
        .failure();

    lineage(&dir)
        .args(["tree", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("asher - Asher family"));
}

#[test]
fn test_read_commands_require_tree() {
    let dir = TempDir::new().unwrap();
    lineage(&dir)
        .args(["-t", "missing", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tree 'missing' not found"));
}

#[test]
fn test_person_add_and_list() {
    let dir = TempDir::new().unwrap();

    lineage(&dir)
        .args(["person", "add", "Jacob", "--birth", "1900", "--gender", "male"])
        .assert()
        .success();
    lineage(&dir)
        .args(["person", "add", "Leah", "--parent", "Jacob", "--birth", "1925"])
        .assert()
        .success();
    lineage(&dir)
        .args(["person", "add", "Leah"])
        .assert()
        .failure();

    lineage(&dir)
        .args(["person", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jacob"))
        .stdout(predicate::str::contains("2 of 2 persons"));

    lineage(&dir)
        .args(["person", "get", "Jacob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Children: Leah"));
}

#[test]
fn test_person_rename_updates_references() {
    let dir = TempDir::new().unwrap();
    import_family(&dir);

    lineage(&dir)
        .args(["-t", "asher", "person", "rename", "Jacob Asher", "Yaakov Asher"])
        .assert()
        .success();

    let output = lineage(&dir)
        .args(["-t", "asher", "-f", "json", "person", "get", "Leah Asher"])
        .output()
        .unwrap();
    let leah: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(leah["Parent"], "Yaakov Asher");
}

#[test]
fn test_import_refuses_non_empty_tree() {
    let dir = TempDir::new().unwrap();
    import_family(&dir);

    let csv = dir.path().join("family.csv");
    lineage(&dir)
        .args(["-t", "asher", "import"])
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--merge"));
}

#[test]
fn test_generations_and_stats() {
    let dir = TempDir::new().unwrap();
    import_family(&dir);

    lineage(&dir)
        .args(["-t", "asher", "generations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Assigned generations to 5 of 5"));

    let output = lineage(&dir)
        .args(["-t", "asher", "-f", "json", "stats"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["total"], 5);
    assert_eq!(stats["living"], 2);
    assert_eq!(stats["distinct_generations"], 3);
    assert_eq!(stats["generations"]["2"]["count"], 2);
}

#[test]
fn test_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    import_family(&dir);

    lineage(&dir)
        .args(["-t", "asher", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is consistent"));

    lineage(&dir)
        .args(["-t", "asher", "person", "update", "Dan Asher", "--death", "1920"])
        .assert()
        .success();

    lineage(&dir)
        .args(["-t", "asher", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid lifespan"));

    lineage(&dir)
        .args(["-t", "asher", "validate", "--no-fail"])
        .assert()
        .success();
}

#[test]
fn test_search() {
    let dir = TempDir::new().unwrap();
    import_family(&dir);

    lineage(&dir)
        .args(["-t", "asher", "search", "tel aviv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Leah Asher"))
        .stdout(predicate::str::contains("Eli Asher"))
        .stdout(predicate::str::contains("(2 matches)"));

    lineage(&dir)
        .args(["-t", "asher", "search", "--gender", "male", "--living"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches"));
}

#[test]
fn test_export_csv_roundtrip() {
    let dir = TempDir::new().unwrap();
    import_family(&dir);

    let out = dir.path().join("out.csv");
    lineage(&dir)
        .args(["-t", "asher", "export", "--export-format", "csv", "-o"])
        .arg(&out)
        .assert()
        .success();

    let content = read(&out);
    assert!(content.starts_with(
        "Name,Parent,Birth,Death,Location,Gender,Spouse,Occupation,Photo,Generation,Highlight,Notes\n"
    ));
    assert!(content.contains("Jacob Asher,,1900,1970,\"Haifa, Israel\",Male,Rivka,Baker,,,true,"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    lineage(&dir)
        .args(["-t", "copy", "import"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 5 persons"));
}

#[test]
fn test_export_graphml() {
    let dir = TempDir::new().unwrap();
    import_family(&dir);

    lineage(&dir)
        .args(["-t", "asher", "export", "--export-format", "graphml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<graph id=\"asher\""))
        .stdout(predicate::str::contains(">spouse</data>"));
}

#[test]
fn test_render_view_model() {
    let dir = TempDir::new().unwrap();
    import_family(&dir);

    let output = lineage(&dir)
        .args(["-t", "asher", "render", "--color-by", "gender", "--size-by-descendants"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(view["edges"].as_array().unwrap().len(), 4);
    assert_eq!(view["nodes"][0]["id"], "Jacob Asher");
    assert_eq!(view["nodes"][0]["color"], "#6B8CAE");
    assert_eq!(view["nodes"][0]["size"], 29);
    assert_eq!(view["nodes"][1]["color"], "#D4A5A5");
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();

    lineage(&dir)
        .args(["config", "set", "min_parent_age", "14"])
        .assert()
        .success();
    lineage(&dir)
        .args(["config", "get", "min_parent_age"])
        .assert()
        .success()
        .stdout("14\n");
    lineage(&dir)
        .args(["config", "set", "color_by", "rainbow"])
        .assert()
        .failure();
    lineage(&dir)
        .args(["config", "get", "nope"])
        .assert()
        .failure();

    assert!(read(&dir.path().join("config.toml")).contains("min_parent_age = 14"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    lineage(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lineage"));
}
