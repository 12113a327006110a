//! Runs the built binary against a temporary project.

use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_css-module-dts"))
}

fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();
    (dir, root)
}

fn request(id: &Utf8PathBuf, code: &str) -> String {
    serde_json::json!({ "id": id, "code": code }).to_string()
}

#[test]
fn generate_writes_declarations_and_reports_json() {
    let (_dir, root) = temp_root();
    let module = root.join("src/card.module.css");
    let plain = root.join("src/global.css");
    let requests = [
        request(&module, "export const card = \"_card_1\";\nexport default { card };\n"),
        request(&plain, "body{}"),
    ]
    .join("\n");
    fs::write(root.join("requests.jsonl"), requests).unwrap();

    let output = bin()
        .args(["--root", root.as_str(), "--no-source-map", "--output", "json"])
        .args(["generate", root.join("requests.jsonl").as_str()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["written"], 1);
    assert_eq!(report["summary"]["skipped"], 1);
    assert_eq!(report["files"][0]["keys"], 1);

    let text =
        fs::read_to_string(root.join("css-module-types/src/card.module.css.d.ts")).unwrap();
    assert!(text.starts_with("declare const styles: {\n"));
    assert!(text.contains("[👀👉 card.module.css]("));
    assert!(text.contains("  readonly \"card\": \"_card_1\";\n"));
    assert!(text.ends_with("};\nexport = styles;"));
}

#[test]
fn malformed_source_map_only_skips_its_own_file() {
    let (_dir, root) = temp_root();
    let bad = root.join("bad.module.css");
    let good = root.join("good.module.css");
    fs::write(&bad, ".b {}").unwrap();
    fs::write(&good, ".g {}").unwrap();

    let bad_code = "const __vite__css = \"._b_1{}\\n/*# sourceMappingURL=data:application/json;base64,!!!! */\"\nexport default { b: \"_b_1\" };\n";
    let good_code = "const __vite__css = \"._g_1{}\"\nexport default { g: \"_g_1\" };\n";
    let requests = [request(&bad, bad_code), request(&good, good_code)].join("\n");
    fs::write(root.join("requests.jsonl"), requests).unwrap();

    let output = bin()
        .args(["--root", root.as_str(), "--output", "json"])
        .args(["generate", root.join("requests.jsonl").as_str()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["warnings"], 1);
    assert_eq!(report["summary"]["written"], 1);
    assert_eq!(report["summary"]["failed"], 0);
    assert_eq!(report["files"][0]["status"], "warning");
    assert_eq!(report["files"][1]["status"], "written");

    assert!(!root.join("css-module-types/bad.module.css.d.ts").exists());
    assert!(root.join("css-module-types/good.module.css.d.ts").is_file());
}

#[test]
fn generate_fails_when_original_file_is_missing() {
    let (_dir, root) = temp_root();
    let module = root.join("gone.module.css");
    fs::write(root.join("requests.jsonl"), request(&module, "export default {};")).unwrap();

    let output = bin()
        .args(["--root", root.as_str()])
        .args(["generate", root.join("requests.jsonl").as_str()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 failed"), "{stdout}");
}

#[test]
fn serve_answers_each_request_line() {
    let (_dir, root) = temp_root();
    let module = root.join("a.module.css");

    let mut child = bin()
        .args(["--root", root.as_str(), "--no-source-map", "serve"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(stdin, "{}", request(&module, "export default { a: \"_a_1\" };")).unwrap();
        writeln!(stdin, "not json").unwrap();
    }

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let mut responses: Vec<serde_json::Value> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    responses.sort_by_key(|r| r["status"].as_str().unwrap_or_default().to_string());

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["status"], "failed");
    assert_eq!(responses[0]["id"], serde_json::Value::Null);
    assert_eq!(responses[1]["status"], "written");
    assert_eq!(responses[1]["id"], module.as_str());
}
