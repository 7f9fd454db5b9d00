//! Checker command implementation.

use aegis_lint_core::{Analyzer, Config};
use aegis_lint_rules::Checker;
use anyhow::{Context, Result};

use crate::config_resolver::ConfigSource;
use crate::CheckArgs;

/// Runs one checker over a tree and prints its report.
pub fn run(checker: Checker, args: &CheckArgs, source: &ConfigSource) -> Result<()> {
    if !args.root.is_dir() {
        println!("error: directory does not exist: {}", args.root.display());
        std::process::exit(1);
    }

    let mut config = match source {
        ConfigSource::Default => Config::default(),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
    };
    if args.jobs.is_some() {
        config.analyzer.parallelism = args.jobs;
    }

    let rule_set = checker.rule_set(&config);
    let mut builder = Analyzer::builder()
        .root(&args.root)
        .config(config)
        .excludes(args.exclude.iter().cloned());
    for rule in rule_set.rules {
        builder = builder.rule_box(rule);
    }
    for rule in rule_set.project_rules {
        builder = builder.project_rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Running {} on {:?} with {} rules",
        checker.name(),
        args.root,
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, checker, &args.root, args.format)?;

    // Warnings never fail a run.
    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}
