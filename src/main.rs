use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env("RECIPE_DEPGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "recipe_depgraph=warn",
            1 => "recipe_depgraph=info,warn",
            _ => "recipe_depgraph=debug,info",
        })
    });

    let format = env::var("RECIPE_DEPGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    // stdout carries the DOT output, keep logs on stderr
    let registry = tracing_subscriber::registry().with(filter);
    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr)).init();
        }
        _ => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
        }
    }
}

fn main() {
    let cli = recipe_depgraph::cli::parse();
    init_tracing(cli.verbose);
    let code = recipe_depgraph::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
