//! deskbook: desk booking from the command line
//!
//! Logs into the booking service (reusing the stored session when it is still
//! valid) and then:
//! - books a desk on every available day matching the wanted weekdays
//! - draws who sits where on a given day
//! - lists, releases and searches reservations

mod commands;
mod logger;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use desk_client::config::{DEFAULT_LOGIN_URL, DEFAULT_SHARE_URL};
use desk_client::{ClientConfig, DeskApi, DeskDirectory, DeskSession};

#[derive(Parser, Debug)]
#[command(name = "deskbook")]
#[command(about = "Book and inspect desks on the desk sharing service")]
struct Cli {
    /// Login name, used when the stored session cannot be refreshed
    #[arg(long, env = "DESK_USERNAME")]
    username: String,

    /// Password, used when the stored session cannot be refreshed
    #[arg(long, env = "DESK_PASSWORD", hide_env_values = true)]
    password: String,

    /// Where the session tokens are kept between runs
    #[arg(long, env = "DESK_SECRET_FILE", default_value = "session_secret.json")]
    secret_file: PathBuf,

    /// Booking service base URL
    #[arg(long, default_value = DEFAULT_SHARE_URL)]
    share_url: String,

    /// Identity provider base URL
    #[arg(long, default_value = DEFAULT_LOGIN_URL)]
    login_url: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Book a desk on every available day falling on the wanted weekdays
    ///
    /// Without weekdays, books the available days on today's weekday.
    Book {
        #[arg(long)]
        zone: String,
        #[arg(long)]
        desk: String,
        /// English weekday name, repeatable
        #[arg(long = "weekday")]
        weekdays: Vec<String>,
    },
    /// Draw the zone maps with everybody's desk for a day
    Map {
        /// Day to draw (YYYY-MM-DD), today by default
        #[arg(long, value_parser = shared::str_to_date)]
        day: Option<NaiveDate>,
        /// Output directory
        #[arg(long, default_value = "maps")]
        out: PathBuf,
        /// Employee highlighted on the map, repeatable
        #[arg(long)]
        vip: Vec<String>,
        /// TrueType/OpenType font for names, the bundled one by default
        #[arg(long)]
        font: Option<PathBuf>,
    },
    /// List my upcoming reservations
    Reservations,
    /// Give my desk back for a day
    Release {
        #[arg(long, value_parser = shared::str_to_date)]
        day: NaiveDate,
    },
    /// Search colleagues by name
    Search { query: String },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.share_url)
            .with_login_url(&self.login_url)
            .with_secret_path(&self.secret_file)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init_logger(&cli.log_level);

    let mut session =
        DeskSession::new(&cli.client_config()).context("Failed to create HTTP session")?;
    session
        .login(&cli.username, &cli.password)
        .await
        .context("Login failed")?;
    let api: Arc<dyn DeskApi> = Arc::new(session);

    let today = chrono::Local::now().date_naive();
    match cli.command {
        Commands::Book {
            zone,
            desk,
            weekdays,
        } => {
            let directory = DeskDirectory::new(api, today);
            commands::book::run(&directory, &zone, &desk, &weekdays, today).await
        }
        Commands::Map {
            day,
            out,
            vip,
            font,
        } => {
            let directory = DeskDirectory::new(api, day.unwrap_or(today));
            commands::map::run(&directory, &out, vip, font.as_deref()).await
        }
        Commands::Reservations => {
            let directory = DeskDirectory::new(api, today);
            commands::reservations::run(&directory).await
        }
        Commands::Release { day } => commands::release::run(api.as_ref(), day).await,
        Commands::Search { query } => {
            let directory = DeskDirectory::new(api, today);
            commands::search::run(&directory, &query).await
        }
    }
}
