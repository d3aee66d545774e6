use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use tokensift_core::report::{model::ToolInfo, render};
use tokensift_core::source::read::{read_source, read_source_from};
use tokensift_core::{TOOL_NAME, inspect_source};

mod args;
mod logging;

fn main() -> Result<()> {
    let args = args::Args::parse();
    logging::init(args.verbose);

    let tool = ToolInfo {
        name: TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: args.commit.clone(),
    };

    let ctx = if args.reads_stdin() {
        read_source_from(io::stdin().lock(), "<stdin>")?
    } else {
        read_source(&args.path)?
    };
    debug!(bytes = ctx.size_bytes, hash = %ctx.hash_hex, "source loaded");

    let report = inspect_source(ctx, tool, &args.engine_config())?;

    let output = match args.format {
        args::OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        args::OutputFormat::Text => render::render_text(&report),
    };

    match args.out {
        Some(path) => std::fs::write(path, &output)?,
        None => print!("{output}"),
    }

    std::process::exit(report.result.classification.exit_code());
}
