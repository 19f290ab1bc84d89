//! E2E tests for the `hinline` binary.
//!
//! Each test builds a real header tree in a temp dir and pipes a root source
//! through the binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn hinline_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hinline"));
    cmd.current_dir(dir);
    cmd.env("HINLINE_LOG", "error");
    cmd.env_remove("HINLINE_INCLUDE_DIR");
    // Keep the user config layer out of the run.
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd
}

fn write_header(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("header has parent")).expect("mkdir");
    fs::write(path, content).expect("write header");
}

fn header_tree() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let inc = dir.path().join("inc");
    write_header(&inc, "lib/tree.h", "#include <vector>\n#include \"../io/reader.h\"\nstruct Tree {};\n");
    write_header(&inc, "io/reader.h", "#include <iostream>\nstruct Reader {};\n");
    dir
}

fn inc_arg(dir: &TempDir) -> String {
    dir.path().join("inc").to_string_lossy().into_owned()
}

#[test]
fn inlines_headers_dependencies_first() {
    let dir = header_tree();
    let output = hinline_cmd(dir.path())
        .args(["-I", &inc_arg(&dir)])
        .write_stdin("#include <iostream>\n#include \"lib/tree.h\"\nint main() {}\n")
        .output()
        .expect("run hinline");
    assert!(
        output.status.success(),
        "hinline failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let unit = String::from_utf8(output.stdout).expect("utf8");
    assert!(unit.starts_with("#include <iostream>\n#include <vector>\n// BEGIN "));
    assert_eq!(unit.matches("#include <iostream>").count(), 1);
    let reader = unit.find("struct Reader {};").expect("reader inlined");
    let tree = unit.find("struct Tree {};").expect("tree inlined");
    assert!(reader < tree);
    assert!(!unit.contains("#include \""));
    assert!(unit.ends_with("int main() {}\n"));
}

#[test]
fn source_without_local_includes_passes_through() {
    let dir = header_tree();
    let source = "#include <vector>\n\nint main() {\n}\n";
    hinline_cmd(dir.path())
        .args(["-I", &inc_arg(&dir)])
        .write_stdin(source)
        .assert()
        .success()
        .stdout(source);
}

#[test]
fn missing_header_fails_with_single_error_line() {
    let dir = header_tree();
    hinline_cmd(dir.path())
        .args(["-I", &inc_arg(&dir)])
        .write_stdin("#include \"nope.h\"\n")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("error: "))
        .stderr(predicate::str::contains("nope.h"));
}

#[test]
fn default_logging_leaves_only_the_error_line() {
    let dir = header_tree();
    let output = hinline_cmd(dir.path())
        .env_remove("HINLINE_LOG")
        .args(["-I", &inc_arg(&dir)])
        .write_stdin("#include \"nope.h\"\n")
        .output()
        .expect("run hinline");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).expect("utf8");
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "stderr: {stderr}");
    assert!(lines[0].starts_with("error: cannot read "));
    assert!(lines[0].contains("nope.h (included from <root>): "));
    assert_eq!(lines[0].matches("os error").count(), 1, "cause repeated: {}", lines[0]);
}

#[test]
fn default_logging_is_silent_on_success() {
    let dir = header_tree();
    hinline_cmd(dir.path())
        .env_remove("HINLINE_LOG")
        .args(["-I", &inc_arg(&dir)])
        .write_stdin("#include \"lib/tree.h\"\n")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn relative_markers_drop_include_dir() {
    let dir = header_tree();
    hinline_cmd(dir.path())
        .args(["-I", &inc_arg(&dir), "--markers", "relative"])
        .write_stdin("#include \"lib/tree.h\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("// BEGIN io/reader.h\n"))
        .stdout(predicate::str::contains("// END lib/tree.h\n"));
}

#[test]
fn exclude_keeps_include_verbatim() {
    let dir = header_tree();
    hinline_cmd(dir.path())
        .args(["-I", &inc_arg(&dir), "-x", "/io/"])
        .write_stdin("#include \"lib/tree.h\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("#include \"../io/reader.h\""))
        .stdout(predicate::str::contains("struct Reader").not());
}

#[test]
fn invalid_exclude_is_rejected() {
    let dir = header_tree();
    hinline_cmd(dir.path())
        .args(["-I", &inc_arg(&dir), "-x", "("])
        .write_stdin("#include \"lib/tree.h\"\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid exclude pattern"));
}

#[test]
fn order_json_lists_headers() {
    let dir = header_tree();
    let output = hinline_cmd(dir.path())
        .args(["-I", &inc_arg(&dir), "--order", "--json"])
        .write_stdin("#include \"lib/tree.h\"\n")
        .output()
        .expect("run hinline");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let headers: Vec<&str> = json["headers"]
        .as_array()
        .expect("headers array")
        .iter()
        .map(|h| h.as_str().expect("string"))
        .collect();
    assert_eq!(headers.len(), 2);
    assert!(headers[0].ends_with("io/reader.h"));
    assert!(headers[1].ends_with("lib/tree.h"));
    assert_eq!(json["system_includes"][0], "#include <vector>");
}

#[test]
fn project_config_supplies_include_dir() {
    let dir = header_tree();
    fs::write(dir.path().join(".hinline.toml"), "include_dir = \"inc\"\n").expect("write config");
    hinline_cmd(dir.path())
        .arg("--order")
        .write_stdin("#include \"lib/tree.h\"\n")
        .assert()
        .success()
        .stdout("inc/io/reader.h\ninc/lib/tree.h\n");
}

#[test]
fn env_include_dir_beats_project_config() {
    let dir = header_tree();
    fs::write(dir.path().join(".hinline.toml"), "include_dir = \"elsewhere\"\n")
        .expect("write config");
    hinline_cmd(dir.path())
        .env("HINLINE_INCLUDE_DIR", "inc")
        .arg("--order")
        .write_stdin("#include \"lib/tree.h\"\n")
        .assert()
        .success()
        .stdout("inc/io/reader.h\ninc/lib/tree.h\n");
}

#[test]
fn verbose_logs_each_header_to_stderr() {
    let dir = header_tree();
    hinline_cmd(dir.path())
        .env_remove("HINLINE_LOG")
        .args(["-v", "-I", &inc_arg(&dir)])
        .write_stdin("#include \"lib/tree.h\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("reading header").not())
        .stderr(predicate::str::contains("reading header"));
}
