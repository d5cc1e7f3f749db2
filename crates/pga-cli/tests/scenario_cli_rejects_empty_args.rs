//! Argument validation happens before any store access, so these run
//! without a database and must exit with the invalid-argument code.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn reconcile_empty_sequence_exits_2() {
    let mut cmd = Command::cargo_bin("pga").unwrap();
    cmd.args(["sequence", "reconcile", "--sequence", "", "--prefix", "PED"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid argument"));
}

#[test]
fn reconcile_blank_prefix_exits_2() {
    let mut cmd = Command::cargo_bin("pga").unwrap();
    cmd.args(["sequence", "reconcile", "--sequence", "pedido", "--prefix", "  "]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--prefix"));
}

#[test]
fn next_empty_sequence_exits_2() {
    let mut cmd = Command::cargo_bin("pga").unwrap();
    cmd.args(["sequence", "next", "--sequence", "", "--prefix", "COT"]);
    cmd.assert().failure().code(2);
}

#[test]
fn config_hash_prints_stable_hash() {
    let dir = std::env::temp_dir().join(format!("pga_cli_cfg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let p = dir.join("base.yaml");
    std::fs::write(&p, "app:\n  name: pangea\n").unwrap();

    let mut cmd = Command::cargo_bin("pga").unwrap();
    cmd.args(["config-hash", p.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("config_hash="));

    let _ = std::fs::remove_dir_all(&dir);
}
