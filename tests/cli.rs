use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ANALYSIS_RESPONSE: &str = "Here is the analysis:\n\n1. **Purpose and Context**\na. Main objective:\n- Pitch the product\n* Pitch the product\n2. **Analysis and Feedback**\na. Strengths:\n• Confident tone\n";

const CHART_RESPONSE: &str = "**Line Chart Analysis**:\na. Overall pattern\nb. Transitions\n**Pie Chart Analysis**:\na. Distribution";

/// Command isolated from the caller's config files and credentials
fn insight(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("insight").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("INSIGHT_CONFIG")
        .env_remove("ASSEMBLYAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    insight(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("platforms"));
}

#[test]
fn test_parse_analysis_file() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("analysis.txt");
    std::fs::write(&input, ANALYSIS_RESPONSE).unwrap();

    let output = insight(&home)
        .args(["parse", "--compact"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let sections: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        sections,
        serde_json::json!([
            {
                "title": "Purpose and Context",
                "subsections": [{"subtitle": "Main objective", "points": ["Pitch the product"]}]
            },
            {
                "title": "Analysis and Feedback",
                "subsections": [{"subtitle": "Strengths", "points": ["Confident tone"]}]
            }
        ])
    );
}

#[test]
fn test_parse_chart_from_stdin() {
    let home = TempDir::new().unwrap();

    insight(&home)
        .args(["parse", "-", "--kind", "chart", "--compact"])
        .write_stdin(CHART_RESPONSE)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#""lineChartAnalysis":[{"title":"","bulletPoints":["Overall pattern","Transitions"]}]"#,
        ))
        .stdout(predicate::str::contains(
            r#""pieChartAnalysis":[{"title":"","bulletPoints":["Distribution"]}]"#,
        ));
}

#[test]
fn test_parse_text_outline_to_file() {
    let home = TempDir::new().unwrap();
    let output_path = home.path().join("outline.txt");

    insight(&home)
        .args(["parse", "-", "-f", "text", "-o"])
        .arg(&output_path)
        .write_stdin(ANALYSIS_RESPONSE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to:"));

    let outline = std::fs::read_to_string(&output_path).unwrap();
    assert!(outline.starts_with("1. Purpose and Context\n   a. Main objective\n      - Pitch the product\n"));
}

#[test]
fn test_parse_honors_configured_glyphs() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.yaml");
    std::fs::write(&config, "parser:\n  bullet_glyphs: [\"+\"]\n").unwrap();

    insight(&home)
        .args(["parse", "-", "--compact", "--config"])
        .arg(&config)
        .write_stdin("1. **Notes**\na. Items:\n+ plus bullet\n- dash bullet\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""points":["plus bullet","- dash bullet"]"#));
}

#[test]
fn test_parse_missing_file_fails() {
    let home = TempDir::new().unwrap();

    insight(&home)
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.txt"));
}

#[test]
fn test_analyze_without_api_key_emits_error_body() {
    let home = TempDir::new().unwrap();

    insight(&home)
        .args(["analyze", "https://www.youtube.com/watch?v=abc", "--compact", "--quiet"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(r#"{"error":"Missing required ASSEMBLYAI_API_KEY"#));
}

#[test]
fn test_analyze_rejects_invalid_url() {
    let home = TempDir::new().unwrap();

    insight(&home)
        .env("ASSEMBLYAI_API_KEY", "test-key")
        .args(["analyze", "not a url", "--compact", "--quiet"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""error":"Unsupported URL: Invalid URL format: not a url""#));
}

#[test]
fn test_config_init_writes_defaults() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("nested").join("config.yaml");

    insight(&home)
        .args(["config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default configuration"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("final_model: anthropic/claude-3-5-sonnet"));
    assert!(!written.contains("api_key"));

    insight(&home)
        .args(["config", "--show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("API Key: not set"));
}

#[test]
fn test_platforms_in_match_order() {
    let home = TempDir::new().unwrap();

    insight(&home)
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Direct URL"))
        .stdout(predicate::str::contains("2. yt-dlp"));
}
