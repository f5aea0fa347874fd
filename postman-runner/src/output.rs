use std::process::ExitCode;

use postman_runner_core::TestResult;
use serde::Serialize;

#[derive(Serialize)]
struct CliError<'a> {
    status: &'static str,
    message: &'a str,
}

pub(super) fn error_exit(message: &str, json: bool) -> ExitCode {
    if json {
        let payload = CliError {
            status: "error",
            message,
        };
        let output = serde_json::to_string_pretty(&payload).unwrap_or(message.to_string());
        eprintln!("{output}");
    } else {
        eprintln!("{message}");
    }
    ExitCode::from(2)
}

pub(super) fn exit_code_for_result(result: &TestResult) -> ExitCode {
    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

pub(super) fn format_test_result_json(result: &TestResult) -> String {
    let payload = serde_json::to_string_pretty(result)
        .unwrap_or("<failed to serialize test result>".to_string());
    format!("{payload}\n")
}

pub(super) fn format_test_result_human(result: &TestResult) -> String {
    let mut output = String::new();
    if result.success {
        output.push_str("Outcome: success\n");
    } else {
        output.push_str("Outcome: failure\n");
    }
    output.push_str(&format!(
        "Tests: {} total, {} passed, {} failed\n",
        result.summary.total, result.summary.passed, result.summary.failed
    ));
    output.push_str(&format!(
        "Duration: {}ms ({} to {})\n",
        result.timings.duration, result.timings.started, result.timings.completed
    ));

    if !result.failures.is_empty() {
        output.push_str("Failures:\n");
        for failure in &result.failures {
            output.push_str(&format!("- {}: {}\n", failure.name, failure.error));
            output.push_str(&format!(
                "  {} {}\n",
                failure.request.method, failure.request.url
            ));
        }
    }

    output
}
