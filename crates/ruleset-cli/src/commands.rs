use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use ruleset_format::describe_category;
use ruleset_sdk::{list_backups, InstallConfig, InstallOutcome, Installer};
use serde::Serialize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, cli.format),
        Command::Check(args) => cmd_check(args, cli.format),
        Command::Show(args) => cmd_show(args, cli.format),
        Command::Backups(args) => cmd_backups(args, cli.format),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Config file values, overridden by whatever flags were given.
fn install_config(args: &MergeArgs) -> anyhow::Result<InstallConfig> {
    let mut config = match &args.config {
        Some(path) => InstallConfig::load(path)?,
        None => InstallConfig::default(),
    };
    if let Some(baseline) = &args.baseline {
        config.baseline = baseline.clone();
    }
    if let Some(user) = &args.user {
        config.user = Some(user.clone());
    }
    if let Some(target) = &args.target {
        config.target = target.clone();
    }
    if args.skip_unchanged {
        config.commit.skip_unchanged = true;
    }
    if args.no_sync {
        config.commit.sync = false;
    }
    Ok(config)
}

fn cmd_merge(args: MergeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let installer = Installer::new(install_config(&args)?);
    let outcome = if args.dry_run {
        installer.dry_run()?
    } else {
        installer.run()?
    };

    if format == OutputFormat::Json {
        return print_json(&outcome);
    }

    for diag in &outcome.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diag);
    }
    let target = installer.config().target.display().to_string();
    if let Some(diff) = &outcome.preview {
        print_preview(&target, diff);
    }
    if let Some(receipt) = &outcome.receipt {
        if receipt.unchanged {
            println!("{} {} already up to date", "✓".green().bold(), target.bold());
        } else {
            println!("{} Wrote {}", "✓".green().bold(), target.bold());
            match &receipt.backup {
                Some(path) => println!("  Backup: {}", path.display().to_string().cyan()),
                None => println!("  Backup: {}", "none (new file)".dimmed()),
            }
            println!("  Digest: {}", receipt.digest.dimmed());
        }
    }
    print_summary(&outcome);
    Ok(())
}

fn print_preview(target: &str, diff: &str) {
    if diff.is_empty() {
        println!("{} {} is up to date", "✓".green().bold(), target.bold());
        return;
    }
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}

fn print_summary(outcome: &InstallOutcome) {
    let report = &outcome.report;
    println!(
        "  Categories: {} ({} from user)",
        outcome.document.len().to_string().bold(),
        report.user_categories.len()
    );
    println!(
        "  Patterns: {} ({} appended, {} duplicates skipped)",
        outcome.document.pattern_count().to_string().bold(),
        report.appended,
        report.skipped_duplicates
    );
    if report.fallback {
        println!("  {}", "baseline only".yellow());
    }
}

#[derive(Serialize)]
struct CheckSummary<'a> {
    file: &'a Path,
    categories: usize,
    patterns: usize,
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("could not read {}", args.file.display()))?;
    let document = ruleset_format::parse(&source)
        .with_context(|| format!("{} is not a valid rule file", args.file.display()))?;

    let summary = CheckSummary {
        file: &args.file,
        categories: document.len(),
        patterns: document.pattern_count(),
    };
    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Text => {
            println!(
                "{} {}: {} categories, {} patterns",
                "✓".green().bold(),
                args.file.display().to_string().bold(),
                summary.categories,
                summary.patterns
            );
            Ok(())
        }
    }
}

fn cmd_show(args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("could not read {}", args.file.display()))?;
    let document = ruleset_format::parse(&source)
        .with_context(|| format!("{} is not a valid rule file", args.file.display()))?;

    if format == OutputFormat::Json {
        return print_json(&document);
    }
    for category in document.categories() {
        println!(
            "{} {}",
            format!("[{}]", category.name()).yellow().bold(),
            describe_category(category.name()).dimmed()
        );
        for pattern in category.patterns() {
            match pattern.comment() {
                Some(comment) => println!("  {}  {}", pattern.text(), format!("# {comment}").dimmed()),
                None => println!("  {}", pattern.text()),
            }
        }
    }
    Ok(())
}

fn cmd_backups(args: BackupsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let backups = list_backups(&args.target)?;
    if format == OutputFormat::Json {
        return print_json(&backups);
    }
    if backups.is_empty() {
        println!("No backups of {}.", args.target.display());
    }
    for backup in &backups {
        println!(
            "{}  {}",
            backup.stamp.to_string().yellow(),
            backup.path.display()
        );
    }
    Ok(())
}
