//! Simple CLI that reads HTML from stdin and outputs the extracted tables as
//! JSON to stdout. Log output goes to stderr and follows `RUST_LOG`.

use std::io::{self, Read};
use std::process::ExitCode;

use rs_tablescout::{extract_with_options, Error, Options};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rs_tablescout=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .without_time()
        .init();

    let mut html = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut html) {
        eprintln!("failed to read from stdin: {err}");
        return ExitCode::FAILURE;
    }

    match extract_with_options(&html, &Options::default()) {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("failed to serialize result: {err}");
                ExitCode::FAILURE
            }
        },
        Err(err @ Error::EmptyDocument) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("extraction failed: {err}");
            ExitCode::FAILURE
        }
    }
}
