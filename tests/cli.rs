use std::fs;
use std::process::{Command, Output};

fn pwzgen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pwzgen"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn generate_python() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("gen");
    let output = pwzgen(&[
        "generate",
        "-o",
        out.to_str().unwrap(),
        "-p",
        "menhir",
        "-p",
        "pwz_nary",
        "-j",
        "2",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let tokens = fs::read_to_string(out.join("pytokens.ml")).unwrap();
    assert!(tokens.starts_with("open Core\n"));
    let menhir = fs::read_to_string(out.join("menhir/pymen.mly")).unwrap();
    assert!(menhir.contains("%start <Pyast.ast> file_input\n"));
    let pwz = fs::read_to_string(out.join("pwz_nary/pwz_nary_pygram.ml")).unwrap();
    assert!(pwz.contains("and pwz_nary_rule_file_input = "));
    assert!(!out.join("dypgen").exists());
}

#[test]
fn unknown_backend() {
    let dir = tempfile::tempdir().unwrap();
    let output = pwzgen(&["generate", "-o", dir.path().to_str().unwrap(), "-p", "yacc"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown backend yacc"));
}

#[test]
fn missing_grammar() {
    let dir = tempfile::tempdir().unwrap();
    let output = pwzgen(&[
        "generate",
        "-g",
        "no/such.grammar",
        "-o",
        dir.path().to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no/such.grammar"));
}

#[test]
fn show_untransformed() {
    let output = pwzgen(&["show", "--untransformed"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("pass_stmt:\n  | 'pass'\n"), "{}", text);
}

#[test]
fn show_normalized() {
    let output = pwzgen(&["show"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(!text.contains("pass_stmt:"));
    assert!(text.contains("if_stmt__lst_1__"));
}

#[test]
fn tokens_and_list() {
    let output = pwzgen(&["tokens"]);
    assert!(output.status.success());
    assert!(stdout(&output).lines().any(|l| l.starts_with("NAME") && l.ends_with("string")));

    let output = pwzgen(&["list"]);
    assert!(output.status.success());
    let backends: Vec<String> = stdout(&output)
        .lines()
        .map(|l| l.split_whitespace().next().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(backends.len(), 10);
    assert_eq!(backends[0], "menhir");
}
