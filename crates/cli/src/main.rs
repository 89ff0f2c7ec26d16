//! Sample App CLI - database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run schema and session-store migrations
//! sample-cli migrate
//!
//! # Create a user (password may also come from SAMPLE_APP_USER_PASSWORD)
//! sample-cli user create -n "Example User" -e example@railstutorial.org -p foobar --admin
//!
//! # Flip a user's admin flag
//! sample-cli user toggle-admin -e example@railstutorial.org
//!
//! # Load sample users and microposts
//! sample-cli seed --file crates/cli/seeds/sample.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sample-cli")]
#[command(author, version, about = "Sample App CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the database with sample users and microposts
    Seed {
        /// Path to the seed YAML file
        #[arg(short, long, default_value = "crates/cli/seeds/sample.yaml")]
        file: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long, env = "SAMPLE_APP_USER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Make the user an admin
        #[arg(long)]
        admin: bool,
    },
    /// Toggle a user's admin flag
    ToggleAdmin {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
                admin,
            } => {
                commands::users::create(&name, &email, &password, admin).await?;
            }
            UserAction::ToggleAdmin { email } => {
                commands::users::toggle_admin(&email).await?;
            }
        },
        Commands::Seed { file } => commands::seed::run(&file).await?,
    }
    Ok(())
}
