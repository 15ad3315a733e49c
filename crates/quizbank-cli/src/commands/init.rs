//! The `quizbank init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizbank.toml").exists() {
        println!("quizbank.toml already exists, skipping.");
    } else {
        std::fs::write("quizbank.toml", SAMPLE_CONFIG)?;
        println!("Created quizbank.toml");
    }

    std::fs::create_dir_all("libraries")?;
    let example_path = std::path::Path::new("libraries/example.toml");
    if example_path.exists() {
        println!("libraries/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_LIBRARY)?;
        println!("Created libraries/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizbank validate");
    println!("  2. Run: quizbank quiz --library example");
    println!("  3. Run: quizbank stats");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizbank configuration

library_dir = "./libraries"
history_file = "./quiz-history.json"

# false asks questions in library order
randomize = true
# seed = 42
"#;

const EXAMPLE_LIBRARY: &str = r#"[library]
name = "Example"
description = "A small library to get started"

[[questions]]
type = "simple"
id = "boiling_point"
prompt = "At what temperature in Celsius does water boil at sea level?"
answer = "100"
post_answer = "Lower air pressure at altitude lowers the boiling point."

[[questions]]
type = "simple"
id = "largest_planet"
prompt = "Which planet is the largest in the solar system?"
answer = "Jupiter"

[[questions]]
type = "composite"
id = "capitals"
template = "What is the capital of [q]?"
column1 = ["France", "Japan", "Kenya", "Peru"]
column2 = ["Paris", "Tokyo", "Nairobi", "Lima"]
"#;
