//! Integration tests for the petri CLI binary.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "bacteria": [
        {"id": "s", "position": {"x": 10.0, "y": 10.0}, "status": "sensitive", "fitness": 0.9, "generation": 3},
        {"id": "r", "position": {"x": 20.0, "y": 10.0}, "status": "resistant", "fitness": 0.4, "generation": 7},
        {"id": "i", "position": {"x": 30.0, "y": 10.0}, "status": "intermediate", "fitness": 0.6, "generation": 5}
    ],
    "zones": [
        {"id": "amp", "center": {"x": 20.0, "y": 10.0}, "radius": 5.0, "concentration": 0.8}
    ],
    "grid": {"width": 100, "height": 100, "physical_width": 100.0, "physical_height": 100.0}
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        // 800x600 surface, 20 px margin: x px = 20 + 7.6 * x, y px = 20 + 5.6 * y
        std::fs::write(
            dir.path().join("config.toml"),
            "[view]\ndefault_width = 800\ndefault_height = 600\nmargin = 20.0\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("snapshot.json"), SNAPSHOT).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_petri"));
        cmd.arg("--config").arg(self.path("config.toml"));
        cmd
    }

    fn snapshot(&self) -> PathBuf {
        self.path("snapshot.json")
    }
}

fn run(cmd: &mut Command) -> String {
    let output = cmd.output().expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if !output.status.success() {
        panic!(
            "Command failed with status {:?}\nstdout: {stdout}\nstderr: {stderr}",
            output.status
        );
    }
    stdout
}

fn hit(f: &Fixture, x: f64, y: f64) -> String {
    run(f
        .cmd()
        .arg("hit")
        .arg("--snapshot")
        .arg(f.snapshot())
        .arg("--x")
        .arg(x.to_string())
        .arg("--y")
        .arg(y.to_string()))
    .trim()
    .to_string()
}

#[test]
fn hit_reports_entity_zone_or_none() {
    let f = Fixture::new();
    // (20, 10) is both the resistant bacterium and the zone center
    assert_eq!(hit(&f, 172.0, 76.0), "entity r resistant");
    // (20, 13): inside the zone, clear of every bacterium
    assert_eq!(hit(&f, 172.0, 92.8), "zone amp");
    assert_eq!(hit(&f, 700.0, 500.0), "none");
}

#[test]
fn render_writes_report_and_commands() {
    let f = Fixture::new();
    let out = f.path("frame.json");
    run(f
        .cmd()
        .arg("render")
        .arg("--snapshot")
        .arg(f.snapshot())
        .arg("--selected")
        .arg("r")
        .arg("--hud")
        .arg("--out")
        .arg(&out));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["report"]["detail"], "Full");
    assert_eq!(json["report"]["entities_drawn"], 3);
    assert_eq!(json["report"]["zones_drawn"], 1);
    let commands = json["commands"].as_array().unwrap();
    assert!(commands.iter().any(|c| c["op"] == "draw_text" && c["text"] == "80%"));
}

#[test]
fn inspect_prints_counts_and_detail() {
    let f = Fixture::new();
    let out = run(f.cmd().arg("inspect").arg("--snapshot").arg(f.snapshot()));
    assert!(out.contains("bacteria:  3"), "{out}");
    assert!(out.contains("zones:     1"), "{out}");
    assert!(out.contains("detail:    full"), "{out}");
    assert!(out.contains("index:     3 points"), "{out}");
    assert!(out.contains("frame:     ") && out.contains("(1 drawn)"), "{out}");
}

#[test]
fn demo_output_feeds_inspect() {
    let f = Fixture::new();
    let demo = f.path("demo.json");
    run(f
        .cmd()
        .arg("demo")
        .arg("--count")
        .arg("2500")
        .arg("--zones")
        .arg("4")
        .arg("--seed")
        .arg("11")
        .arg("--out")
        .arg(&demo));
    let out = run(f.cmd().arg("inspect").arg("--snapshot").arg(&demo));
    assert!(out.contains("bacteria:  2500"), "{out}");
    assert!(out.contains("zones:     4"), "{out}");
    // 2001..=4000 at scale 1 stays medium
    assert!(out.contains("detail:    medium"), "{out}");
}

#[test]
fn missing_snapshot_fails() {
    let f = Fixture::new();
    let output = f
        .cmd()
        .arg("inspect")
        .arg("--snapshot")
        .arg(Path::new("/nonexistent/snapshot.json"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load snapshot"), "{stderr}");
}
