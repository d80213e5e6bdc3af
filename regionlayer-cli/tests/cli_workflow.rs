//! End-to-end tests for the `regionlayer` binary.
//!
//! Each test writes a config.ini pointing the cache and log file into a
//! temporary directory, so nothing touches the user's home directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const BOUNDARIES: &str = r#"{
    "version": "cli-test-1",
    "regions": {
        "us-nv": [[[-120.0, 42.0], [-114.0, 42.0], [-114.0, 36.2], [-114.6, 35.0], [-120.0, 39.0]]],
        "us-ut": [[[-114.0, 42.0], [-111.0, 42.0], [-111.0, 41.0], [-109.0, 41.0], [-109.0, 37.0], [-114.0, 37.0]]]
    }
}"#;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = format!(
            "[cache]\ndirectory = {}\n\n[logging]\nfile = {}\n",
            dir.path().join("cache").display(),
            dir.path().join("logs").join("regionlayer.log").display(),
        );
        fs::write(dir.path().join("config.ini"), config).unwrap();
        fs::write(dir.path().join("regions.json"), BOUNDARIES).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        let config = self.path("config.ini");
        let boundaries = self.path("regions.json");
        Command::new(env!("CARGO_BIN_EXE_regionlayer"))
            .arg("--config")
            .arg(&config)
            .arg("--boundaries")
            .arg(&boundaries)
            .args(args)
            .output()
            .expect("Failed to execute CLI command")
    }

    fn stored_tiles(&self) -> usize {
        count_files(&self.path("cache").join("tiles"))
    }
}

fn count_files(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|e| {
            let path = e.path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_render_writes_png_and_base_tile() {
    let ws = Workspace::new();
    let output_path = ws.path("tile.png");

    let output = ws.run(&[
        "render",
        "--zoom",
        "4",
        "--x",
        "2",
        "--y",
        "6",
        "--highlight",
        "us-nv",
        "--output",
        output_path.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let png = fs::read(&output_path).unwrap();
    assert_eq!(&png[..8], &PNG_SIGNATURE);
    assert_eq!(ws.stored_tiles(), 1);
    let marker = fs::read_to_string(ws.path("cache").join("VERSION")).unwrap();
    assert!(marker.trim().starts_with("cli-test-1+"), "marker: {}", marker);
}

#[test]
fn test_prewarm_then_stats_then_clear() {
    let ws = Workspace::new();

    let output = ws.run(&["prewarm", "--max-zoom", "3"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("Prewarm complete"));
    let stored = ws.stored_tiles();
    assert!(stored >= 4, "one tile per zoom at least, got {}", stored);

    let output = ws.run(&["cache", "stats"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("RegionLayer Cache Statistics"));
    assert!(text.contains("cli-test-1"));

    let output = ws.run(&["cache", "clear"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(&format!("Deleted {} base tiles", stored)));
    assert_eq!(ws.stored_tiles(), 0);
}

#[test]
fn test_render_without_boundaries_fails() {
    let ws = Workspace::new();
    let output = Command::new(env!("CARGO_BIN_EXE_regionlayer"))
        .arg("--config")
        .arg(ws.path("config.ini"))
        .args(["render", "--zoom", "1", "--x", "0", "--y", "0", "--output"])
        .arg(ws.path("tile.png"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--boundaries"));
}

#[test]
fn test_invalid_config_value_fails() {
    let ws = Workspace::new();
    fs::write(ws.path("config.ini"), "[render]\nborder_width = wide\n").unwrap();

    let output = ws.run(&["cache", "stats"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("border_width"));
}

#[test]
fn test_init_writes_config() {
    let ws = Workspace::new();
    let path = ws.path("fresh").join("config.ini");

    let output = Command::new(env!("CARGO_BIN_EXE_regionlayer"))
        .arg("--config")
        .arg(&path)
        .arg("init")
        .output()
        .unwrap();

    assert!(output.status.success());
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[render]"));
    assert!(content.contains("memory_entries"));
}
