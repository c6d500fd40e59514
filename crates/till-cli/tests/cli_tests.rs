//! CLI integration tests
//!
//! Runs the `till` binary against programs in temporary directories.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Write `source` to main.till in a fresh directory
fn project(source: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("main.till");
    fs::write(&file, source).unwrap();
    (dir, file)
}

fn till_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("till").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("TILL_LOG")
        .env_remove("TILL_DIAGNOSTICS")
        .env_remove("TILL_MAX_CALL_DEPTH")
        .env_remove("TILL_LINE_NUMBERS");
    cmd
}

// ══════════════════════════════════════════════════════════════════════════════
// run
// ══════════════════════════════════════════════════════════════════════════════

mod run {
    use super::*;

    #[test]
    fn test_run_prints_displays() {
        let (dir, file) = project(
            "factorial(Num n) -> Num\n    Num r = 1\n    while n > 1\n        r = r * n\n        n = n - 1\n    return r\ndisplay factorial(5)\ndisplay \"done\"\n",
        );
        till_cmd(&dir)
            .arg("run")
            .arg(&file)
            .assert()
            .success()
            .stdout("120\ndone\n");
    }

    #[test]
    fn test_run_line_numbers_flag() {
        let (dir, file) = project("Num x = 1\ndisplay x\n");
        till_cmd(&dir)
            .args(["run", "--line-numbers"])
            .arg(&file)
            .assert()
            .success()
            .stdout("2: 1\n");
    }

    #[test]
    fn test_runtime_error_keeps_earlier_output() {
        let (dir, file) = project("display 1\ndisplay 1 / 0\ndisplay 2\n");
        till_cmd(&dir)
            .arg("run")
            .arg(&file)
            .assert()
            .code(1)
            .stdout("1\n")
            .stderr(predicate::str::contains("error[TL4001]"))
            .stderr(predicate::str::contains("main.till:2:9"));
    }

    #[test]
    fn test_type_error_prevents_all_output() {
        let (dir, file) = project("display 1\nNum x = true\n");
        till_cmd(&dir)
            .arg("run")
            .arg(&file)
            .assert()
            .code(1)
            .stdout("")
            .stderr(predicate::str::contains("error[TL3004]"));
    }

    #[test]
    fn test_json_diagnostics() {
        let (dir, file) = project("if true\n    display 1\n  display 2\n");
        let output = till_cmd(&dir)
            .args(["run", "--json"])
            .arg(&file)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8(output.stderr).unwrap();
        let diag: serde_json::Value = serde_json::from_str(stderr.trim()).unwrap();
        assert_eq!(diag["code"], "TL1006");
        assert_eq!(diag["phase"], "lex");
        assert_eq!(diag["line"], 3);
    }

    #[test]
    fn test_json_diagnostics_from_env() {
        let (dir, file) = project("display x\n");
        till_cmd(&dir)
            .env("TILL_DIAGNOSTICS", "json")
            .arg("run")
            .arg(&file)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("\"code\":\"TL3001\""));
    }

    #[test]
    fn test_max_call_depth_flag() {
        let (dir, file) = project("down(Num n) -> Num\n    return down(n + 1)\ndisplay down(0)\n");
        till_cmd(&dir)
            .args(["run", "--max-call-depth", "50"])
            .arg(&file)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("error[TL4003]"))
            .stderr(predicate::str::contains("50"));
    }

    #[test]
    fn test_default_depth_limit_is_reported_not_crashed() {
        let (dir, file) = project("down(Num n) -> Num\n    return down(n + 1)\ndisplay down(0)\n");
        till_cmd(&dir)
            .arg("run")
            .arg(&file)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("error[TL4003]"));
    }

    #[test]
    fn test_project_config_is_applied() {
        let (dir, file) = project("display 7\n");
        fs::write(dir.path().join("till.toml"), "[output]\nline_numbers = true\n").unwrap();
        till_cmd(&dir)
            .arg("run")
            .arg(&file)
            .assert()
            .success()
            .stdout("1: 7\n");
    }

    #[test]
    fn test_env_overrides_project_config() {
        let (dir, file) = project("display 7\n");
        fs::write(dir.path().join("till.toml"), "[output]\nline_numbers = true\n").unwrap();
        till_cmd(&dir)
            .env("TILL_LINE_NUMBERS", "false")
            .arg("run")
            .arg(&file)
            .assert()
            .success()
            .stdout("7\n");
    }

    #[test]
    fn test_invalid_project_config_fails() {
        let (dir, file) = project("display 7\n");
        fs::write(dir.path().join("till.toml"), "[runtime]\nmax_call_depth = 0\n").unwrap();
        till_cmd(&dir)
            .arg("run")
            .arg(&file)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("till.toml"));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        till_cmd(&dir)
            .args(["run", "missing.till"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Failed to read source file"));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// check / tokens / ast
// ══════════════════════════════════════════════════════════════════════════════

mod inspect {
    use super::*;

    #[test]
    fn test_check_success_does_not_execute() {
        let (dir, file) = project("display 1 / 0\n");
        till_cmd(&dir)
            .arg("check")
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("no errors found"))
            .stdout(predicate::str::contains("1 / 0").not());
    }

    #[test]
    fn test_check_reports_scope_error() {
        let (dir, file) = project("if true\n    Num y = 1\ndisplay y\n");
        till_cmd(&dir)
            .arg("check")
            .arg(&file)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("unknown variable 'y'"));
    }

    #[test]
    fn test_tokens_show_layout() {
        let (dir, file) = project("if true\n    display 1\n");
        till_cmd(&dir)
            .arg("tokens")
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("2:1 Indent"))
            .stdout(predicate::str::contains("Dedent"))
            .stdout(predicate::str::contains("2:5 Display \"display\""));
    }

    #[test]
    fn test_ast_is_versioned_json() {
        let (dir, file) = project("Num x = 1\n");
        let output = till_cmd(&dir).arg("ast").arg(&file).output().unwrap();
        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["ast_version"], 1);
        assert!(json["statements"][0]["VarDecl"].is_object());
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// fmt
// ══════════════════════════════════════════════════════════════════════════════

mod fmt {
    use super::*;

    #[test]
    fn test_fmt_rewrites_file() {
        let (dir, file) = project("Num x=1\nwhile x<3\n  x=x+1\n");
        till_cmd(&dir).arg("fmt").arg(&file).assert().success();
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "Num x = 1\nwhile x < 3\n    x = x + 1\n"
        );
    }

    #[test]
    fn test_fmt_check_fails_on_unformatted() {
        let (dir, file) = project("Num x=1\n");
        till_cmd(&dir)
            .args(["fmt", "--check"])
            .arg(&file)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Would reformat"));
        assert_eq!(fs::read_to_string(&file).unwrap(), "Num x=1\n");
    }

    #[test]
    fn test_fmt_uses_project_indent() {
        let (dir, file) = project("if true\n    display 1\n");
        fs::write(dir.path().join("till.toml"), "[formatting]\nindent = 2\n").unwrap();
        till_cmd(&dir).arg("fmt").arg(&file).assert().success();
        assert_eq!(fs::read_to_string(&file).unwrap(), "if true\n  display 1\n");
    }

    #[test]
    fn test_fmt_rejects_indent_size_out_of_range() {
        let (dir, file) = project("if true\n    display 1\n");
        till_cmd(&dir)
            .args(["fmt", "--indent-size", "17"])
            .arg(&file)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--indent-size must be between 1 and 16"));
    }

    #[test]
    fn test_fmt_reports_syntax_error() {
        let (dir, file) = project("display\n");
        till_cmd(&dir)
            .arg("fmt")
            .arg(&file)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("error[TL2001]"));
    }
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    till_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("tokens"))
        .stdout(predicate::str::contains("fmt"))
        .stdout(predicate::str::contains("TILL_LOG"));
}
