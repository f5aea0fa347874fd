#![cfg_attr(not(test), deny(clippy::expect_used, clippy::unwrap_used))]

use std::process::ExitCode;
use std::sync::Arc;

use postman_runner_core::{CollectionRunner, NewmanCliEngine};

mod cli;
mod config;
mod mcp;
mod output;

pub use cli::{Cli, Command};
use output::{error_exit, exit_code_for_result, format_test_result_human, format_test_result_json};

pub async fn run(cli: Cli) -> ExitCode {
    let json = matches!(cli.command, Command::Run { json: true, .. });
    let runner = match build_runner(&cli) {
        Ok(runner) => runner,
        Err(message) => return error_exit(&message, json),
    };

    match cli.command {
        Command::Mcp { .. } => match mcp::run_stdio(runner).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => error_exit(&message, false),
        },
        Command::Run {
            collection,
            environment,
            globals,
            iteration_count,
            json,
        } => {
            let request = match config::run_request(
                &collection,
                environment.as_deref(),
                globals.as_deref(),
                iteration_count,
            ) {
                Ok(request) => request,
                Err(message) => return error_exit(&message, json),
            };
            let result = match runner.run_collection(&request).await {
                Ok(result) => result,
                Err(error) => return error_exit(&error.message, json),
            };
            let output = if json {
                format_test_result_json(&result)
            } else {
                format_test_result_human(&result)
            };
            print!("{output}");
            exit_code_for_result(&result)
        }
    }
}

fn build_runner(cli: &Cli) -> Result<Arc<CollectionRunner>, String> {
    let options = config::runner_options(cli)?;
    let engine = NewmanCliEngine::new(config::newman_config(cli));
    log::debug!("using newman command '{}'", engine.config().command);
    Ok(Arc::new(
        CollectionRunner::new(Arc::new(engine)).with_options(options),
    ))
}

#[cfg(test)]
mod tests;
