//! quizline CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "quizline", version, about = "Timed multiple-choice quizzes")]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
pub(crate) struct GlobalOpts {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the file the signed-in user is stored in
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Skip simulated network latency
    #[arg(long, global = true)]
    instant: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List quiz categories
    Categories,

    /// Take a timed quiz
    Take {
        /// Category id (see `quizline categories`)
        category: String,
    },

    /// Sign in
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user and their stats
    #[command(alias = "whoami")]
    Dashboard,

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizline=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = run(cli.command, &cli.global).await;

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }

    // The stdin reader thread cannot be cancelled; exit without waiting on it.
    process::exit(0);
}

async fn run(command: Commands, global: &GlobalOpts) -> anyhow::Result<()> {
    if let Commands::Init = command {
        return commands::init::execute();
    }

    let mut app = app::App::build(global)?;
    match command {
        Commands::Categories => commands::categories::execute(&app).await,
        Commands::Take { category } => commands::take::execute(&app, &category).await,
        Commands::Login { email, password } => {
            commands::account::login(&mut app, &email, &password).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::account::register(&mut app, &name, &email, &password).await,
        Commands::Logout => commands::account::logout(&mut app),
        Commands::Dashboard => commands::account::dashboard(&app),
        Commands::Init => Ok(()),
    }
}
