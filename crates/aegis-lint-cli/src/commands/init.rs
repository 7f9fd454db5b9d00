//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const CONFIG_FILE: &str = "aegis-lint.toml";

const DEFAULT_CONFIG: &str = r#"# aegis-lint configuration

[analyzer]
# Glob patterns to exclude from analysis (any `build` directory is always skipped)
exclude = [
    "**/third_party/**",
    "**/generated/**",
]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per CPU)
# parallelism = 4

[scan]
# Lines above a declaration searched for @isr_safe / @isr_unsafe
isr_lookback = 10
# Lines above a header function searched for @req / @design / @asil
trace_lookback = 15
# Lines at the top of a file that form its header comment
header_lines = 20
# Which marker wins when both appear in the window: "farthest" or "nearest"
isr_mark_precedence = "farthest"

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.layering]
enabled = true

[rules.naming]
enabled = true

[rules.isr-safety]
enabled = true
# Collect @isr_unsafe marks from every file before checking ISR bodies
whole_program = false

[rules.traceability]
enabled = true
# severity = "warning"  # Override default severity

[rules.globals]
enabled = true
# Directory where mutable globals are tolerated
escape_hatch = "port"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: aegis-lint all .");

    Ok(())
}
