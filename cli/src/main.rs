//! formula-drawer binary entry point

use clap::Parser;
use formula_drawer::{report_outcome, run, Args};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    let result = run(&args, &mut stdin.lock(), &mut stdout);
    ExitCode::from(report_outcome(&result, &mut stdout, &mut std::io::stderr()))
}
