use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "postman-runner",
    version,
    about = "Run Postman collections with newman, directly or as an MCP tool"
)]
pub struct Cli {
    /// Program used to launch newman.
    #[arg(long, global = true, default_value = "newman")]
    pub newman_command: String,
    /// Extra argument placed before `run` when launching newman (repeatable).
    #[arg(long = "newman-arg", global = true, allow_hyphen_values = true)]
    pub newman_args: Vec<String>,
    /// Fail a collection run that takes longer than this many seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Eq, PartialEq, Subcommand)]
pub enum Command {
    /// Serve the run-collection tool over MCP.
    Mcp {
        /// Use stdio transport for the MCP server (default and only supported).
        #[arg(long)]
        stdio: bool,
    },
    /// Run one collection and print the result.
    Run {
        /// Path or URL to the collection.
        collection: String,
        /// Path or URL to an environment file.
        #[arg(short = 'e', long)]
        environment: Option<String>,
        /// Path or URL to a globals file.
        #[arg(short = 'g', long)]
        globals: Option<String>,
        /// Number of iterations to run.
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        iteration_count: Option<i64>,
        /// Emit JSON output instead of human-readable output.
        #[arg(long)]
        json: bool,
    },
}
