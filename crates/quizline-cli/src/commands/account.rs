//! The `quizline login`, `register`, `logout`, and `dashboard` commands.

use anyhow::Result;
use comfy_table::Table;

use crate::app::App;

pub async fn login(app: &mut App, email: &str, password: &str) -> Result<()> {
    eprintln!("Signing in...");
    let user = app.auth.login(email, password).await?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn register(app: &mut App, name: &str, email: &str, password: &str) -> Result<()> {
    anyhow::ensure!(!name.trim().is_empty(), "name must not be empty");
    anyhow::ensure!(email.contains('@'), "'{email}' is not an email address");

    eprintln!("Creating account...");
    let user = app.auth.register(name, email, password).await?;
    println!("Welcome, {}! You are now signed in.", user.name);
    Ok(())
}

pub fn logout(app: &mut App) -> Result<()> {
    let was_signed_in = app.auth.is_authenticated();
    app.auth.logout()?;
    if was_signed_in {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub fn dashboard(app: &App) -> Result<()> {
    let Some(user) = app.auth.current_user() else {
        anyhow::bail!("not signed in; run `quizline login` first");
    };

    println!("Welcome, {}!\n", user.name);

    let stats = user.stats.clone().unwrap_or_default();
    let mut table = Table::new();
    table.set_header(vec!["Your Stats", ""]);
    table.add_row(vec!["Quizzes Completed".to_string(), stats.completed.to_string()]);
    table.add_row(vec!["Average Score".to_string(), format!("{}%", stats.average_score)]);
    table.add_row(vec!["Best Category".to_string(), stats.best_category]);
    println!("{table}");

    println!("\nBrowse quizzes with: quizline categories");
    Ok(())
}
