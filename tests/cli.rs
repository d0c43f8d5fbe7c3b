use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const BLOCKS_HASH: &str =
    "$F$04$1$abcdefghijklmnopqrstuvq3cGjANWh7KUX8LsO3i8X64fPw0evt6r.APOCC8TWn";

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("passnest"));
    // keep a developer's .env or shell settings out of the tests
    cmd.current_dir(std::env::temp_dir())
        .env_remove("PASSNEST_PASSWORD")
        .env_remove("PASSNEST_COST");
    cmd
}

fn hash_with(args: &[&str], password: &str) -> String {
    let output = bin()
        .env("PASSNEST_PASSWORD", password)
        .arg("hash")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim_end().to_string()
}

#[test]
fn hash_and_verify_roundtrip() {
    let hash = hash_with(&["--cost", "4"], "hello world");
    assert!(hash.starts_with("$2a$04$"));

    bin()
        .env("PASSNEST_PASSWORD", "hello world")
        .arg("verify")
        .arg(&hash)
        .assert()
        .success()
        .stdout(predicate::str::contains("match"));

    bin()
        .env("PASSNEST_PASSWORD", "goodbye world")
        .arg("verify")
        .arg(&hash)
        .assert()
        .failure()
        .stdout(predicate::str::contains("no match"));
}

#[test]
fn fallback_hash_roundtrip() {
    let hash = hash_with(&["--cost", "4", "--fallback"], "pw");
    assert!(hash.starts_with("$F$04$1$"));

    bin()
        .env("PASSNEST_PASSWORD", "pw")
        .arg("verify")
        .arg(&hash)
        .assert()
        .success();
}

#[test]
fn legacy_dialect_is_selectable() {
    let hash = hash_with(&["--cost", "4", "--fallback", "--dialect", "legacy"], "pw");
    assert!(hash.starts_with("$F$08$"));
}

#[test]
fn cost_is_read_from_env() {
    bin()
        .env("PASSNEST_PASSWORD", "pw")
        .env("PASSNEST_COST", "5")
        .arg("hash")
        .arg("--fallback")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("$F$05$1$"));
}

#[test]
fn dotenv_file_is_loaded() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "PASSNEST_COST=6\nPASSNEST_PASSWORD=pw\n").unwrap();

    bin()
        .current_dir(dir.path())
        .arg("hash")
        .arg("--fallback")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("$F$06$1$"));
}

#[test]
fn cost_is_clamped() {
    let hash = hash_with(&["--cost", "0", "--fallback"], "pw");
    assert!(hash.starts_with("$F$04$1$"));
}

#[test]
fn invalid_block_count_fails() {
    bin()
        .env("PASSNEST_PASSWORD", "pw")
        .arg("hash")
        .arg("--fallback")
        .arg("--blocks")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("block count"));
}

#[test]
fn password_from_stdin() {
    bin()
        .arg("verify")
        .arg(BLOCKS_HASH)
        .write_stdin("hello world\n")
        .assert()
        .success();
}

#[test]
fn verify_known_fallback_hash() {
    bin()
        .env("PASSNEST_PASSWORD", "goodbye world")
        .arg("verify")
        .arg(BLOCKS_HASH)
        .assert()
        .failure();
}

#[test]
fn inspect_fallback_hash() {
    bin()
        .arg("inspect")
        .arg(BLOCKS_HASH)
        .assert()
        .success()
        .stdout(predicate::str::contains("fallback (blocks, 1)"))
        .stdout(predicate::str::contains("cost:    4"))
        .stdout(predicate::str::contains("salt:    abcdefghijklmnopqrstuv"));
}

#[test]
fn inspect_json() {
    let output = bin()
        .arg("inspect")
        .arg("--json")
        .arg(BLOCKS_HASH)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["scheme"], "fallback");
    assert_eq!(value["cost"], 4);
    assert_eq!(value["dialect"]["blocks"], 1);
    assert_eq!(value["salt"], "abcdefghijklmnopqrstuv");
}

#[test]
fn inspect_native_hash() {
    bin()
        .arg("inspect")
        .arg("--json")
        .arg("$2a$04$abcdefghijklmnopqrstuu")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"native\""));
}

#[test]
fn inspect_malformed_fails() {
    bin()
        .arg("inspect")
        .arg("$F$xx$1$abcdefghijklmnopqrstuv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to read hash"));
}

#[test]
fn random_bytes_prints_hex() {
    bin()
        .arg("random-bytes")
        .arg("20")
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[0-9a-f]{40}\n$").unwrap());
}

#[test]
fn random_key_prints_alphabet() {
    bin()
        .arg("random-key")
        .arg("20")
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[./0-9A-Za-z]{20}\n$").unwrap());
}
