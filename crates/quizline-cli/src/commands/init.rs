//! The `quizline init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizline.toml").exists() {
        println!("quizline.toml already exists, skipping.");
    } else {
        std::fs::write("quizline.toml", SAMPLE_CONFIG)?;
        println!("Created quizline.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizline categories");
    println!("  2. Run: quizline login --email user@example.com --password password");
    println!("  3. Run: quizline take science");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizline configuration

# Seconds allowed per quiz attempt.
time_budget_secs = 300

# Where the signed-in user is remembered between runs.
store_path = "${HOME}/.config/quizline/store.json"

# Simulated network latency of the mock data API, in milliseconds.
[latency]
categories_ms = 800
questions_ms = 1000
submit_ms = 800
auth_ms = 1000
"#;
