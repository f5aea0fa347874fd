use super::*;
use std::sync::OnceLock;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use postman_runner_core::{FailedRequest, FailureRecord, TestResult, TestSummary, TestTimings};
use postman_runner_test_support::EnvVarGuard;

static MCP_ENV_LOCK: OnceLock<tokio::sync::Mutex<()>> = OnceLock::new();

pub(crate) fn mcp_env_lock() -> &'static tokio::sync::Mutex<()> {
    MCP_ENV_LOCK.get_or_init(|| tokio::sync::Mutex::new(()))
}

fn sample_result(success: bool) -> TestResult {
    let failures = if success {
        Vec::new()
    } else {
        vec![FailureRecord {
            name: "Status code is 200".to_string(),
            error: "expected 404 to equal 200".to_string(),
            request: FailedRequest {
                method: "GET".to_string(),
                url: "https://api.example.com/items".to_string(),
            },
        }]
    };
    TestResult {
        success,
        summary: TestSummary::new(3, failures.len() as i64),
        failures,
        timings: TestTimings {
            started: "2024-01-01T00:00:00.000Z".to_string(),
            completed: "2024-01-01T00:00:01.500Z".to_string(),
            duration: 1_500,
        },
    }
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn cli_parses_run_command() {
    let cli = Cli::parse_from([
        "postman-runner",
        "run",
        "./collection.json",
        "-e",
        "./env.json",
        "--globals",
        "./globals.json",
        "-n",
        "3",
        "--json",
    ]);
    assert_eq!(
        cli.command,
        Command::Run {
            collection: "./collection.json".to_string(),
            environment: Some("./env.json".to_string()),
            globals: Some("./globals.json".to_string()),
            iteration_count: Some(3),
            json: true,
        }
    );
    assert_eq!(cli.newman_command, "newman");
    assert!(cli.newman_args.is_empty());
    assert_eq!(cli.timeout_secs, None);
}

#[test]
fn cli_accepts_negative_iteration_count_for_validation() {
    let cli = Cli::parse_from(["postman-runner", "run", "c.json", "-n", "-1"]);
    assert!(matches!(
        cli.command,
        Command::Run {
            iteration_count: Some(-1),
            ..
        }
    ));
}

#[test]
fn cli_parses_global_engine_flags_after_subcommand() {
    let cli = Cli::parse_from([
        "postman-runner",
        "mcp",
        "--stdio",
        "--newman-command",
        "npx",
        "--newman-arg",
        "newman",
        "--timeout-secs",
        "30",
    ]);
    assert_eq!(cli.command, Command::Mcp { stdio: true });
    assert_eq!(cli.newman_command, "npx");
    assert_eq!(cli.newman_args, vec!["newman".to_string()]);
    assert_eq!(cli.timeout_secs, Some(30));
}

#[test]
fn config_builds_engine_and_runner_options() {
    let cli = Cli::parse_from([
        "postman-runner",
        "--newman-command",
        "npx",
        "--newman-arg",
        "newman",
        "--timeout-secs",
        "5",
        "mcp",
    ]);
    let newman = config::newman_config(&cli);
    assert_eq!(newman.command, "npx");
    assert_eq!(newman.args, vec!["newman".to_string()]);
    let options = config::runner_options(&cli).expect("options");
    assert_eq!(options.timeout, Some(Duration::from_secs(5)));
}

#[test]
fn config_rejects_zero_timeout() {
    let cli = Cli::parse_from(["postman-runner", "--timeout-secs", "0", "mcp"]);
    let error = config::runner_options(&cli).expect_err("zero timeout");
    assert_eq!(error, "timeout-secs must be greater than 0");
}

#[test]
fn run_request_uses_tool_validation() {
    let request = config::run_request("c.json", Some("env.json"), None, Some(2)).expect("request");
    assert_eq!(request.environment.as_deref(), Some("env.json"));
    assert_eq!(request.iteration_count, Some(2));

    let error = config::run_request("c.json", None, None, Some(0)).expect_err("zero count");
    assert_eq!(error, "iterationCount must be greater than 0");
    let error = config::run_request("", None, None, None).expect_err("empty collection");
    assert_eq!(error, "collection must not be empty");
}

#[test]
fn human_output_reports_success() {
    let output = output::format_test_result_human(&sample_result(true));
    assert_eq!(
        output,
        "Outcome: success\n\
         Tests: 3 total, 3 passed, 0 failed\n\
         Duration: 1500ms (2024-01-01T00:00:00.000Z to 2024-01-01T00:00:01.500Z)\n"
    );
}

#[test]
fn human_output_lists_failures() {
    let output = output::format_test_result_human(&sample_result(false));
    assert!(output.starts_with("Outcome: failure\n"));
    assert!(output.contains("Tests: 3 total, 2 passed, 1 failed\n"));
    assert!(output.contains(
        "Failures:\n- Status code is 200: expected 404 to equal 200\n  GET https://api.example.com/items\n"
    ));
}

#[test]
fn json_output_is_the_test_result() {
    let result = sample_result(false);
    let output = output::format_test_result_json(&result);
    let parsed: TestResult = serde_json::from_str(&output).expect("json output");
    assert_eq!(parsed, result);
}

#[test]
fn exit_codes_follow_run_outcome() {
    assert_eq!(
        output::exit_code_for_result(&sample_result(true)),
        ExitCode::SUCCESS
    );
    assert_eq!(
        output::exit_code_for_result(&sample_result(false)),
        ExitCode::from(1)
    );
    assert_eq!(output::error_exit("bad input", true), ExitCode::from(2));
}

#[tokio::test]
async fn run_rejects_invalid_arguments_with_exit_code_2() {
    let cli = Cli::parse_from(["postman-runner", "run", "c.json", "-n", "0"]);
    assert_eq!(run(cli).await, ExitCode::from(2));

    let cli = Cli::parse_from(["postman-runner", "--timeout-secs", "0", "run", "c.json"]);
    assert_eq!(run(cli).await, ExitCode::from(2));
}

#[tokio::test]
async fn run_reports_missing_newman_with_exit_code_2() {
    let cli = Cli::parse_from([
        "postman-runner",
        "--newman-command",
        "postman-runner-no-such-newman",
        "run",
        "c.json",
    ]);
    assert_eq!(run(cli).await, ExitCode::from(2));
}

#[tokio::test]
async fn run_mcp_stdio_exits_successfully() {
    let _lock = mcp_env_lock().lock().await;
    let _transport = EnvVarGuard::set("POSTMAN_RUNNER_MCP_TEST_TRANSPORT", "1");
    let _bad = EnvVarGuard::remove("POSTMAN_RUNNER_MCP_BAD_TRANSPORT");
    let _exit = EnvVarGuard::set("POSTMAN_RUNNER_MCP_EXIT_IMMEDIATELY", "1");
    let cli = Cli::parse_from(["postman-runner", "mcp", "--stdio"]);
    assert_eq!(run(cli).await, ExitCode::SUCCESS);
}

#[tokio::test]
async fn run_mcp_stdio_bad_transport_returns_exit_code_2() {
    let _lock = mcp_env_lock().lock().await;
    let _transport = EnvVarGuard::set("POSTMAN_RUNNER_MCP_TEST_TRANSPORT", "1");
    let _bad = EnvVarGuard::set("POSTMAN_RUNNER_MCP_BAD_TRANSPORT", "1");
    let _exit = EnvVarGuard::remove("POSTMAN_RUNNER_MCP_EXIT_IMMEDIATELY");
    let cli = Cli::parse_from(["postman-runner", "mcp"]);
    assert_eq!(run(cli).await, ExitCode::from(2));
}
