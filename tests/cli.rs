//! Integration tests for the rotadiff binary

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use std::process::Command;

struct Cleanup(PathBuf);
impl Drop for Cleanup {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn temp_dir(tag: &str) -> (PathBuf, Cleanup) {
    let dir = std::env::temp_dir().join(format!(
        "rotadiff_cli_{}_{}_{}_{:?}",
        tag,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos(),
        std::thread::current().id(),
    ));
    std::fs::create_dir_all(&dir).unwrap();
    // Tests must not depend on a user's ~/.config/rotadiff/config.toml.
    std::fs::write(dir.join("config.toml"), "").unwrap();
    let cleanup = Cleanup(dir.clone());
    (dir, cleanup)
}

fn write_rota(path: &Path, monday: &str, extra_sheet: &str) {
    let mut workbook = Workbook::new();
    let rota = workbook.add_worksheet();
    rota.set_name("Rota").unwrap();
    rota.write_string(0, 0, "Name").unwrap();
    rota.write_string(0, 1, "Mon").unwrap();
    rota.write_string(1, 0, "Day").unwrap();
    rota.write_string(1, 1, monday).unwrap();
    rota.write_number(2, 0, 1.0).unwrap();
    let extra = workbook.add_worksheet();
    extra.set_name(extra_sheet).unwrap();
    workbook.save(path).unwrap();
}

fn run(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_rotadiff"))
        .arg("--config")
        .arg(dir.join("config.toml"))
        .args(args)
        .output()
        .expect("Failed to execute rotadiff");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn pair(dir: &Path) -> (String, String) {
    let a = dir.join("a.xlsx");
    let b = dir.join("b.xlsx");
    write_rota(&a, "Alice", "Notes");
    write_rota(&b, "Bob", "Audit");
    (a.display().to_string(), b.display().to_string())
}

#[test]
fn test_sheets_lists_common_names() {
    let (dir, _cleanup) = temp_dir("sheets");
    let (a, b) = pair(&dir);
    let (stdout, _, code) = run(&dir, &["sheets", &a, &b]);
    assert_eq!(stdout.trim(), "Rota");
    assert_eq!(code, 0);
}

#[test]
fn test_diff_text_reports_changed_cell() {
    let (dir, _cleanup) = temp_dir("text");
    let (a, b) = pair(&dir);
    let (stdout, _, code) = run(&dir, &["diff", &a, &b]);
    assert!(stdout.contains("Sheet: Rota"));
    assert!(stdout.contains("Changed cells:    1"));
    assert!(stdout.contains("Alice"));
    assert!(stdout.contains("Bob"));
    assert_eq!(code, 1);
}

#[test]
fn test_diff_csv_output() {
    let (dir, _cleanup) = temp_dir("csv");
    let (a, b) = pair(&dir);
    let (stdout, _, code) = run(&dir, &["diff", &a, &b, "--format", "csv"]);
    assert_eq!(stdout.trim_end(), "Cell,Row,Col,A,B\nB2,2,2,Alice,Bob");
    assert_eq!(code, 1);
}

#[test]
fn test_diff_json_to_file() {
    let (dir, _cleanup) = temp_dir("json");
    let (a, b) = pair(&dir);
    let out = dir.join("report.json");
    let out_arg = out.display().to_string();
    let (_, stderr, code) = run(
        &dir,
        &["diff", &a, &b, "--sheet", "Rota", "-f", "json", "-o", &out_arg],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Wrote report"));
    let json = std::fs::read_to_string(&out).unwrap();
    assert!(json.contains("\"Cell\": \"B2\""));
    assert!(json.contains("\"changed_cells\": 1"));
}

#[test]
fn test_identical_workbooks_exit_zero() {
    let (dir, _cleanup) = temp_dir("same");
    let (a, _) = pair(&dir);
    let (stdout, _, code) = run(&dir, &["diff", &a, &a, "--format", "markdown"]);
    assert!(stdout.contains("No differences detected"));
    assert_eq!(code, 0);
}

#[test]
fn test_max_changes_caps_output() {
    let (dir, _cleanup) = temp_dir("cap");
    let a = dir.join("a.xlsx");
    let b = dir.join("b.xlsx");
    for (path, offset) in [(&a, 0.0), (&b, 0.5)] {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Rota").unwrap();
        for row in 0..3u32 {
            for col in 0..3u16 {
                sheet.write_number(row, col, row as f64 + col as f64 + offset).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }
    let (a, b) = (a.display().to_string(), b.display().to_string());
    let (stdout, _, code) = run(&dir, &["diff", &a, &b, "--max-changes", "4", "--format", "csv"]);
    assert_eq!(stdout.lines().count(), 5);
    assert_eq!(code, 1);

    let (stdout, _, _) = run(&dir, &["diff", &a, &b, "--max-changes", "4"]);
    assert!(stdout.contains("stopped after 4 differences"));
}

#[test]
fn test_unreadable_workbook_is_an_error() {
    let (dir, _cleanup) = temp_dir("bad");
    let (a, _) = pair(&dir);
    let bad = dir.join("bad.xlsx");
    std::fs::write(&bad, b"not a workbook").unwrap();
    let bad = bad.display().to_string();
    let (_, stderr, code) = run(&dir, &["diff", &a, &bad]);
    assert!(stderr.starts_with("Error:"));
    assert_eq!(code, 2);
}

#[cfg(unix)]
#[test]
fn test_variants_with_copying_solver() {
    let (dir, _cleanup) = temp_dir("variants");
    let (input, _) = pair(&dir);
    let out_dir = dir.join("out").display().to_string();
    // Stand-in solver: copies --input to --output.
    let script = r#"while [ $# -gt 0 ]; do case "$1" in --input) src="$2"; shift;; --output) dst="$2"; shift;; esac; shift; done; cp "$src" "$dst""#;
    let (stdout, stderr, code) = run(
        &dir,
        &[
            "variants",
            "--input",
            &input,
            "--out-dir",
            &out_dir,
            "--seed",
            "5",
            "--seed",
            "6",
            "--solver",
            "sh",
            "--solver-arg",
            "-c",
            "--solver-arg",
            script,
            "--solver-arg",
            "solver",
        ],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Variant 1 (seed 5): Strict"));
    assert!(stdout.contains("Variant 2 (seed 6): Strict"));
    assert!(stdout.contains("Differences against Variant 1 (seed 5):"));
    assert!(stdout.contains("Variant 2 (seed 6) [Rota]: 0 cells, 0 rows, 0 columns"));
    assert!(dir.join("out").join("Rota_Solved_V2.xlsx").exists());
}

#[cfg(unix)]
#[test]
fn test_variants_all_failing() {
    let (dir, _cleanup) = temp_dir("variants_fail");
    let (input, _) = pair(&dir);
    let out_dir = dir.join("out").display().to_string();
    let (stdout, stderr, code) = run(
        &dir,
        &[
            "variants",
            "--input",
            &input,
            "--out-dir",
            &out_dir,
            "--seed",
            "1",
            "--no-relax-weekends",
            "--solver",
            "sh",
            "--solver-arg",
            "-c",
            "--solver-arg",
            "echo INFEASIBLE >&2; exit 3",
            "--solver-arg",
            "solver",
        ],
    );
    assert_eq!(code, 1);
    assert!(stdout.contains("Variant 1 (seed 1): failed under all attempts"));
    assert!(stdout.contains("INFEASIBLE"));
    assert!(stderr.contains("No variants could be produced"));
}
