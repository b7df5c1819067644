//! `guardpatch` binary entry point

use guardpatch_cli::{command, init_tracing, render, run, Invocation, EXIT_ERROR};
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = command().get_matches();

    let invocation = match Invocation::from_matches(&matches) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(EXIT_ERROR);
        }
    };
    init_tracing(invocation.verbose);

    let result = run(&invocation)
        .and_then(|summary| Ok((render(&summary, invocation.json, invocation.verbose)?, summary)));

    match result {
        Ok((text, summary)) => {
            println!("{text}");
            ExitCode::from(summary.exit_code())
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
