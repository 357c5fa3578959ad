use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn cli() -> Command {
    Command::cargo_bin("combat-cli").unwrap()
}

#[test]
fn lists_builtin_enemies() {
    cli()
        .arg("enemies")
        .assert()
        .success()
        .stdout(predicate::str::contains("goblin"))
        .stdout(predicate::str::contains("Bog Witch"));
}

#[test]
fn roll_prints_one_line_per_roll() {
    let out = cli()
        .args(["roll", "--seed", "3", "--sides", "6", "--rolls", "4"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    let values: Vec<i32> = text.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(values.len(), 4);
    assert!(values.iter().all(|v| (1..=6).contains(v)));
}

#[test]
fn duel_prints_log() {
    cli()
        .args(["duel", "--enemy", "goblin", "--seed", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[START]"))
        .stdout(predicate::str::contains("[END] outcome="));
}

#[test]
fn duel_json_has_outcome() {
    cli()
        .args(["duel", "--enemy", "cave_troll", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\""));
}

#[test]
fn duel_many_prints_summary() {
    cli()
        .args(["duel-many", "--samples", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("samples:        20"));
}

#[test]
fn unknown_enemy_fails() {
    cli()
        .args(["duel", "--enemy", "dragon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown builtin enemy 'dragon'"));
}

#[test]
fn enemy_dump_is_json() {
    let out = cli()
        .args(["enemy-dump", "--id", "bog_witch"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["name"], "Bog Witch");
    assert_eq!(value["tactics"], "caster");
}

#[test]
fn watch_runs_to_the_end() {
    cli()
        .args(["watch", "--enemy", "goblin", "--max-delay-ms", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wins").or(predicate::str::contains("round cap")));
}

#[test]
fn simulate_vs_reads_enemy_file() {
    let target = Path::new(env!("CARGO_MANIFEST_DIR")).join("../engine/content/enemies/goblin.json");
    Command::cargo_bin("simulate-vs")
        .unwrap()
        .arg("--target")
        .arg(target)
        .args(["--trials", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trials:             25"))
        .stdout(predicate::str::contains("Goblin"));
}
