//! The `quizline take` command: an interactive, timed quiz runner.
//!
//! Reads one command per line from stdin while the countdown runs:
//! an option number answers the current question, `n` / `p` navigate,
//! `t` shows the clock, and `q` abandons the attempt.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use quizline_core::model::CompletionReason;
use quizline_core::timer::{format_clock, format_time_spent, Severity};
use quizline_core::traits::ResultSink;
use quizline_core::{Phase, QuizSession, SessionOptions};

use crate::app::App;

/// One line of user input during a running attempt.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Answer(usize),
    Next,
    Previous,
    Clock,
    Show,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        return Input::Answer(n);
    }
    match line.to_lowercase().as_str() {
        "" => Input::Show,
        "n" | "next" | "f" | "finish" => Input::Next,
        "p" | "prev" | "previous" => Input::Previous,
        "t" | "time" => Input::Clock,
        "q" | "quit" => Input::Quit,
        _ => Input::Unknown,
    }
}

pub async fn execute(app: &App, category_id: &str) -> Result<()> {
    eprintln!("Loading quiz...");
    let options = SessionOptions {
        time_budget_secs: app.config.time_budget_secs,
        ..Default::default()
    };
    let sink: Arc<dyn ResultSink> = app.sink.clone();
    let mut session = QuizSession::load(&app.source, category_id, options)
        .await
        .context("failed to load quiz")?
        .with_reporting(app.auth.current_user(), sink);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Ready to start?");
    println!("This quiz contains {} questions.", session.question_count());
    println!(
        "You will have {} to complete the quiz.",
        format_time_spent(session.time_budget_secs())
    );
    println!("Press Enter when you're ready to begin (q to quit).");

    match lines.next_line().await? {
        Some(line) if parse_input(&line) != Input::Quit => {}
        _ => {
            println!("Quiz abandoned.");
            return Ok(());
        }
    }

    session.start();
    render_question(&session);
    let mut band = session.timer().severity;

    while session.phase() == Phase::Running {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!("Quiz abandoned.");
                    return Ok(());
                };
                match parse_input(&line) {
                    Input::Answer(n) => answer(&mut session, n),
                    Input::Next => {
                        if session.next().is_none() {
                            render_question(&session);
                        }
                    }
                    Input::Previous => {
                        session.previous();
                        render_question(&session);
                    }
                    Input::Clock => {
                        println!("Time remaining: {}", format_clock(session.time_remaining()));
                    }
                    Input::Show => render_question(&session),
                    Input::Quit => {
                        println!("Quiz abandoned.");
                        return Ok(());
                    }
                    Input::Unknown => {
                        println!(
                            "Enter an option number, n (next), p (previous), t (time), or q (quit)."
                        );
                    }
                }
            }
            remaining = session.next_tick() => {
                let severity = Severity::from_remaining(remaining);
                if severity != band && remaining > 0 {
                    band = severity;
                    println!("[{}] {} remaining", severity, format_clock(remaining));
                }
            }
        }
    }

    session.settle().await;
    render_results(&session, app.auth.is_authenticated());
    Ok(())
}

fn answer(session: &mut QuizSession, choice: usize) {
    let Some(question) = session.current_question() else {
        return;
    };
    let Some(option) = choice
        .checked_sub(1)
        .and_then(|i| question.options.get(i))
        .cloned()
    else {
        println!("Choose an option between 1 and {}.", question.options.len());
        return;
    };
    let id = question.id.to_string();
    session.select_answer(&id, &option);
    println!("Selected: {option}");
}

fn render_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        println!("\nThis quiz has no questions. Enter n to finish.");
        return;
    };
    let timer = session.timer();
    let selected = session.selected_answer(question.id);

    println!();
    println!(
        "Question {} of {}  [{} {}]  {}%",
        session.current_index() + 1,
        session.question_count(),
        timer.text,
        timer.severity,
        session.progress_percent()
    );
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(option.as_str()) { "*" } else { " " };
        println!(" {marker} {}) {option}", i + 1);
    }
    let next_label = if session.is_last_question() {
        "finish"
    } else {
        "next"
    };
    println!(
        "[1-{}] answer  [n] {next_label}  [p] previous  [q] quit",
        question.options.len()
    );
}

fn render_results(session: &QuizSession, authenticated: bool) {
    let Some(outcome) = session.outcome() else {
        return;
    };

    println!();
    if outcome.reason == CompletionReason::TimeExpired {
        println!("Time's up!");
    }
    println!("Quiz Completed!");
    println!("Score: {}%", outcome.score);
    println!("Correct Answers: {} / {}", outcome.correct, outcome.total);
    println!("Time Spent: {}", format_time_spent(outcome.time_spent_secs));

    if let Some(questions) = session.review() {
        println!("\nReview:");
        for question in questions {
            let given = session.selected_answer(&question.id).unwrap_or("-");
            let expected = question.correct_answer.as_deref().unwrap_or("-");
            let mark = if question.is_correct(session.selected_answer(&question.id)) {
                "+"
            } else {
                "-"
            };
            println!("  [{mark}] {} (yours: {given}, answer: {expected})", question.text);
        }
    }

    if !authenticated {
        println!("\nSign in to track your results: quizline login");
    }
}
