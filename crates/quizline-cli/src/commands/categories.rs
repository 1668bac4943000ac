//! The `quizline categories` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizline_core::traits::QuizSource;

use crate::app::App;

pub async fn execute(app: &App) -> Result<()> {
    eprintln!("Loading categories...");
    let categories = app.source.list_categories().await?;

    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Questions", "Difficulty", "Description"]);
    for category in &categories {
        table.add_row(vec![
            Cell::new(&category.id),
            Cell::new(&category.name),
            Cell::new(category.question_count),
            Cell::new(&category.difficulty),
            Cell::new(&category.description),
        ]);
    }

    println!("{table}");
    println!("\nStart a quiz with: quizline take <id>");
    Ok(())
}
