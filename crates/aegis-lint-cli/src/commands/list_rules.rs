//! List rules command implementation.

use aegis_lint_rules::{all_rules, Checker};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<14} {:<40} Description", "Name", "Codes");
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!(
            "{:<14} {:<40} {}",
            rule.name(),
            rule.codes().join(", "),
            rule.description()
        );
    }

    println!("\nCheckers:");
    for checker in Checker::ALL {
        println!("  {:<14} {}", checker.name(), checker.title());
    }

    println!("\nExamples:");
    println!("  aegis-lint layering ./firmware");
    println!("  aegis-lint all ./firmware --format json");
}
