use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LONG_HASH: &str = "abcd1234abcd1234abcd1234abcd1234abcd1234abcd1234abcd1234abcd1234";

fn write_index(game_dir: &Path, name: &str, json: &str) {
    let dir = game_dir.join("assets").join("indexes");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), json).unwrap();
}

fn write_object(game_dir: &Path, hash: &str, content: &str) {
    let dir = game_dir.join("assets").join("objects").join(&hash[..2]);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(hash), content).unwrap();
}

fn langextract(work_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("langextract").unwrap();
    cmd.current_dir(work_dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn extracts_latest_index_translations() {
    let game = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_index(game.path(), "1.9.json", r#"{"objects": {}}"#);
    write_index(game.path(), "1.2.json", r#"{"objects": {}}"#);
    write_index(
        game.path(),
        "1.10.json",
        &format!(
            r#"{{"objects": {{
                "minecraft/lang/en_us.json": {{"hash": "{}"}},
                "minecraft/sounds.json": {{"hash": "cc33"}}
            }}}}"#,
            LONG_HASH
        ),
    );
    write_object(game.path(), LONG_HASH, r#"{"hello":"world"}"#);

    langextract(work.path())
        .arg("--minecraft-dir")
        .arg(game.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully extracted 1 translation files for 1.10.",
        ));

    let out_dir = work.path().join("translations");
    assert_eq!(
        fs::read_to_string(out_dir.join("en_us.json")).unwrap(),
        r#"{"hello":"world"}"#
    );
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 1);
}

#[test]
fn custom_output_dir_and_json_report() {
    let game = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_index(
        game.path(),
        "17.json",
        r#"{"objects": {
            "minecraft/lang/en_us.json": {"hash": "aa11", "size": 2},
            "minecraft/lang/fr_fr.json": {"hash": "bb22", "size": 2}
        }}"#,
    );
    write_object(game.path(), "aa11", "en");
    write_object(game.path(), "bb22", "fr");

    let output = langextract(work.path())
        .arg("-s")
        .arg(game.path())
        .args(["-o", "lang", "--output-format", "json", "--report", "run.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout["files_copied"], 2);
    assert_eq!(stdout["manifest"]["version"], "17");

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(work.path().join("run.json")).unwrap()).unwrap();
    assert_eq!(saved["files_copied"], 2);
    assert!(work.path().join("lang").join("fr_fr.json").is_file());
}

#[test]
fn empty_index_directory_fails_with_not_found() {
    let game = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    fs::create_dir_all(game.path().join("assets").join("indexes")).unwrap();

    langextract(work.path())
        .arg("--minecraft-dir")
        .arg(game.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No versioned asset index"));

    assert!(!work.path().join("translations").exists());
}

#[test]
fn missing_object_fails() {
    let game = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_index(
        game.path(),
        "5.json",
        r#"{"objects": {"minecraft/lang/en_us.json": {"hash": "dead00"}}}"#,
    );

    langextract(work.path())
        .arg("--minecraft-dir")
        .arg(game.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("minecraft/lang/en_us.json"));

    assert!(!work.path().join("translations").join("en_us.json").exists());
}

#[test]
fn size_mismatch_fails_unless_disabled() {
    let game = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_index(
        game.path(),
        "5.json",
        r#"{"objects": {"minecraft/lang/en_us.json": {"hash": "aa11", "size": 99}}}"#,
    );
    write_object(game.path(), "aa11", "short");

    langextract(work.path())
        .arg("--minecraft-dir")
        .arg(game.path())
        .assert()
        .code(8);
    assert!(!work.path().join("translations").join("en_us.json").exists());

    langextract(work.path())
        .arg("--minecraft-dir")
        .arg(game.path())
        .arg("--no-verify-size")
        .assert()
        .success();
    assert!(work.path().join("translations").join("en_us.json").is_file());
}

#[test]
fn malformed_index_fails_with_parse_error() {
    let game = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_index(game.path(), "5.json", "{ not json");

    langextract(work.path())
        .arg("--minecraft-dir")
        .arg(game.path())
        .assert()
        .code(4);
}

#[test]
fn dry_run_copies_nothing() {
    let game = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_index(
        game.path(),
        "5.json",
        r#"{"objects": {"minecraft/lang/en_us.json": {"hash": "aa11"}}}"#,
    );
    write_object(game.path(), "aa11", "{}");

    langextract(work.path())
        .arg("--minecraft-dir")
        .arg(game.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("minecraft/lang/en_us.json -> en_us.json"));

    assert!(!work.path().join("translations").exists());
}

#[test]
fn config_file_sets_output_directory() {
    let game = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    write_index(
        game.path(),
        "5.json",
        r#"{"objects": {"minecraft/lang/en_us.json": {"hash": "aa11"}}}"#,
    );
    write_object(game.path(), "aa11", "{}");
    fs::write(
        work.path().join("langextract.toml"),
        "[output]\ndirectory = \"from-config\"\n",
    )
    .unwrap();

    langextract(work.path())
        .arg("--minecraft-dir")
        .arg(game.path())
        .arg("-q")
        .assert()
        .success();

    assert!(work.path().join("from-config").join("en_us.json").is_file());
}

#[test]
fn generate_config_writes_sample() {
    let work = TempDir::new().unwrap();

    langextract(work.path())
        .args(["--generate-config", "--config", "sample.toml"])
        .assert()
        .success();

    let content = fs::read_to_string(work.path().join("sample.toml")).unwrap();
    assert!(content.contains("[filter]"));
    assert!(content.contains("minecraft/lang"));
}

#[cfg(target_os = "linux")]
#[test]
fn uses_platform_default_directory() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let game_dir = home.path().join(".minecraft");
    write_index(
        &game_dir,
        "5.json",
        r#"{"objects": {"minecraft/lang/en_us.json": {"hash": "aa11"}}}"#,
    );
    write_object(&game_dir, "aa11", "{}");

    langextract(work.path())
        .env("HOME", home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("for 5."));
}
