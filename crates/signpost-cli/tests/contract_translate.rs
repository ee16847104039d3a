#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const RUN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<start-suite id="0-1000" name="Calc" fullname="Tests.Calc"/>
<start-test id="0-1001" name="Adds" fullname="Tests.Calc.Adds"/>
<test-output type="Out" testid="0-1001"><![CDATA[computing 1+2
]]></test-output>
<test-case id="0-1001" name="Adds" fullname="Tests.Calc.Adds" result="Passed" time="1.5"/>
<start-test id="0-1002" name="Divides" fullname="Tests.Calc.Divides"/>
<test-case id="0-1002" name="Divides" result="Failed" time="0.25"><failure><message><![CDATA[Expected 2 but was 0]]></message><stack-trace><![CDATA[at Calc.Divides()]]></stack-trace></failure></test-case>
<test-suite id="0-1000" name="Calc" result="Failed"/>
"#;

/// The binary with every option source cleared, so the host environment
/// (including a real TeamCity agent) cannot leak into assertions.
fn signpost() -> Command {
    let mut cmd = Command::cargo_bin("signpost").unwrap();
    for var in [
        "TEAMCITY_VERSION",
        "SIGNPOST_TEAMCITY",
        "SIGNPOST_LABELS",
        "SIGNPOST_FLOW_IDS",
        "SIGNPOST_LOG",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn teamcity_stream_from_stdin() {
    let expected = "##teamcity[testSuiteStarted name='Calc']\n\
##teamcity[testStarted name='Adds' captureStandardOutput='true']\n\
##teamcity[message text='computing 1+2|n']\n\
computing 1+2\n\
##teamcity[testFinished name='Adds' duration='1500']\n\
##teamcity[testStarted name='Divides' captureStandardOutput='true']\n\
##teamcity[testFailed name='Divides' message='Expected 2 but was 0' details='at Calc.Divides()']\n\
##teamcity[testFinished name='Divides' duration='250']\n\
##teamcity[testSuiteFinished name='Calc']\n";

    signpost()
        .args(["translate", "--teamcity"])
        .write_stdin(RUN)
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn labels_only_from_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("progress.xml");
    fs::write(&input, RUN).unwrap();

    signpost()
        .args(["translate", "--labels", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout("***** Adds\ncomputing 1+2\n***** Divides\n");
}

#[test]
fn single_report_argument() {
    signpost()
        .args([
            "translate",
            "--teamcity",
            "--report",
            r#"<test-case name="It's" result="Skipped" time="0"><reason><message>[slow]</message></reason></test-case>"#,
        ])
        .assert()
        .success()
        .stdout("##teamcity[testIgnored name='It|'s' message='|[slow|]']\n");
}

#[test]
fn flow_ids_are_opt_in() {
    signpost()
        .args([
            "translate",
            "--teamcity",
            "--flow-ids",
            "--report",
            r#"<start-test id="0-1001" name="Adds"/>"#,
        ])
        .assert()
        .success()
        .stdout("##teamcity[testStarted name='Adds' captureStandardOutput='true' flowId='0-1001']\n");
}

#[test]
fn teamcity_agent_is_detected() {
    signpost()
        .env("TEAMCITY_VERSION", "2024.12")
        .args(["translate", "--report", r#"<start-suite name="Calc"/>"#])
        .assert()
        .success()
        .stdout("##teamcity[testSuiteStarted name='Calc']\n");
}

#[test]
fn env_var_enables_labels() {
    signpost()
        .env("SIGNPOST_LABELS", "true")
        .args(["translate", "--report", r#"<start-test name="Adds"/>"#])
        .assert()
        .success()
        .stdout("***** Adds\n");
}

#[test]
fn config_file_sets_options() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("signpost.yaml");
    fs::write(&config, "build_messages: true\nlabels: true\n").unwrap();

    signpost()
        .args(["translate", "--config"])
        .arg(&config)
        .args(["--report", r#"<start-test name="Adds"/>"#])
        .assert()
        .success()
        .stdout(
            "##teamcity[testStarted name='Adds' captureStandardOutput='true']\n***** Adds\n",
        );
}

#[test]
fn incomplete_report_is_skipped_and_logged() {
    let input = concat!(
        r#"<test-case name="A" time="0.1"/>"#,
        "\n",
        r#"<start-suite name="Calc"/>"#,
    );
    signpost()
        .args(["translate", "--teamcity"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("##teamcity[testSuiteStarted name='Calc']\n")
        .stderr(predicate::str::contains("skipping report").and(predicate::str::contains("result")));
}

#[test]
fn strict_mode_stops_at_first_rejected_report() {
    let input = concat!(
        r#"<start-suite name="Calc"/>"#,
        r#"<test-case name="A" result="Passed" time="soon"/>"#,
        r#"<test-suite name="Calc" result="Passed"/>"#,
    );
    signpost()
        .args(["translate", "--teamcity", "--strict"])
        .write_stdin(input)
        .assert()
        .code(1)
        .stdout("##teamcity[testSuiteStarted name='Calc']\n");
}

#[test]
fn malformed_stream_ends_translation() {
    signpost()
        .args(["translate", "--labels"])
        .write_stdin(r#"<start-test name="A"/><start-test name="B""#)
        .assert()
        .success()
        .stdout("***** A\n")
        .stderr(predicate::str::contains("malformed report"));
}

#[test]
fn unknown_reports_are_silent() {
    signpost()
        .args(["translate", "--teamcity", "--labels", "--strict"])
        .write_stdin(r#"<test-run id="2" testcasecount="1"/><test-message>hi</test-message>"#)
        .assert()
        .success()
        .stdout("")
        .stderr("");
}

#[test]
fn missing_input_file_is_internal_error() {
    signpost()
        .args(["translate", "--input", "/nonexistent/progress.xml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to open input"));
}

#[test]
fn invalid_config_is_internal_error() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("signpost.yaml");
    fs::write(&config, "teamcity: yes\n").unwrap();

    signpost()
        .args(["translate", "--config"])
        .arg(&config)
        .args(["--report", r#"<start-suite name="Calc"/>"#])
        .assert()
        .code(2)
        .stdout("");
}

#[test]
fn escape_subcommand() {
    signpost()
        .args(["escape", "|'", "a[1]\nb"])
        .assert()
        .success()
        .stdout("|||'\na|[1|]|nb\n");
}

#[test]
fn version_prints_package_version() {
    signpost()
        .arg("version")
        .assert()
        .success()
        .stdout(format!("{}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_describes_every_subcommand() {
    signpost()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Translate progress reports"))
        .stdout(predicate::str::contains("Print values escaped"))
        .stdout(predicate::str::contains("Print the signpost version"));
}
