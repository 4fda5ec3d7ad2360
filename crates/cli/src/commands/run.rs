use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use odin_checks::checks;
use odin_checks::report::{ErrorLog, NdjsonSink};
use odin_checks::runner::{EngineConfig, ScanEngine};
use odin_checks::task::TaskInput;
use std::path::PathBuf;

#[derive(Args)]
pub struct RunArgs {
    /// Task input JSON: {"program_id": ..., "params": {"urls": [...]}}
    #[arg(short, long, default_value = "/task/input.json")]
    input: PathBuf,

    /// NDJSON issue stream, one finding per line.
    #[arg(short, long, default_value = "/task/output.ndjson")]
    output: PathBuf,

    /// Append-only error stream.
    #[arg(short, long, default_value = "/task/errors.txt")]
    errors: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let errors = ErrorLog::open(&args.errors)
        .with_context(|| format!("cannot open error stream {}", args.errors.display()))?;

    let task = match TaskInput::load(&args.input) {
        Ok(task) => task,
        Err(e) => {
            errors.error(e.to_string());
            return Err(e.into());
        }
    };

    println!("{}", "Discovering checks...".bright_blue());
    let registry = checks::builtin();
    if registry.is_empty() {
        let e = odin_checks::EngineError::EmptyRegistry;
        errors.error(e.to_string());
        return Err(e.into());
    }
    println!("Loaded {} check(s)", registry.len());
    if args.verbose {
        for entry in registry.entries() {
            println!("  {} ({})", entry.descriptor.id, entry.path.dimmed());
        }
    }

    let config = EngineConfig::from_env(&errors);
    let mut engine = ScanEngine::new(registry, config).map_err(|e| {
        errors.error(e.to_string());
        anyhow::Error::from(e)
    })?;

    println!("{}", "Warming up checks...".bright_blue());
    engine.warm_up(&errors);

    let sink = NdjsonSink::create(&args.output)
        .with_context(|| format!("cannot create output stream {}", args.output.display()))?;

    println!(
        "Starting checks for {} service(s) with {} worker(s)",
        task.urls.len(),
        engine.workers()
    );

    let mut records_written = 0usize;
    for url in &task.urls {
        println!("Checking {}", url.bright_cyan());
        for issue in engine.scan_target(url, task.program_id, &errors) {
            match sink.write(&issue) {
                Ok(()) => records_written += 1,
                Err(e) => errors.error(format!("Error writing record: {e}")),
            }
        }
    }

    println!(
        "{} Found {} issue(s)",
        "Done.".bright_green(),
        records_written
    );
    if records_written == 0 {
        errors.warning("No issues found");
    }

    Ok(())
}
