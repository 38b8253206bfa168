use clap::Parser;
use linecall_agent::{Cli, run};
use std::error::Error;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    run(Cli::parse()).await
}
