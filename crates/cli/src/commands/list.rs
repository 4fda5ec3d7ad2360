use anyhow::Result;
use clap::Args;
use colored::*;
use odin_checks::checks;
use odin_checks::Severity;

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long)]
    verbose: bool,
}

fn severity_label(severity: Severity) -> ColoredString {
    let label = severity.to_string();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.bright_red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.bright_yellow(),
        Severity::Info => label.blue(),
    }
}

pub fn execute(args: ListArgs) -> Result<()> {
    let registry = checks::builtin();
    println!("{} registered check(s)\n", registry.len());

    for entry in registry.entries() {
        println!(
            "{:<24} {:<10} {}",
            entry.descriptor.id.bold(),
            severity_label(entry.descriptor.severity),
            entry.descriptor.description
        );
        if args.verbose {
            println!("  path: {}", entry.path.dimmed());
        }
    }

    Ok(())
}
