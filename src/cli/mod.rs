use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::application::{BotService, DEFAULT_CURRENCY, WindowReport, help_text};
use crate::domain::{TIMESTAMP_FORMAT, parse_timestamp};
use crate::storage::{LedgerStore, Store, StoreKind};

/// Tally - chat-style personal finance tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Record signed amounts from chat messages and report balances by category")]
#[command(version)]
pub struct Cli {
    /// Ledger store path (.csv for a plain sheet, anything else is SQLite)
    #[arg(short, long, env = "TALLY_STORE", default_value = "tally.db")]
    pub store: String,

    /// Store backend: csv, sqlite (inferred from the path when omitted)
    #[arg(long, env = "TALLY_BACKEND")]
    pub backend: Option<String>,

    /// Currency label shown after amounts
    #[arg(long, env = "TALLY_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger store
    Init,

    /// Read messages from stdin, one per line, and print each reply
    Chat {
        /// User the messages are sent as
        #[arg(short, long, env = "TALLY_USER")]
        user: String,
    },

    /// Handle a single message, e.g. `tally send -u alice -- -100 food`
    Send {
        /// User the message is sent as
        #[arg(short, long, env = "TALLY_USER")]
        user: String,

        /// Local time of the message (YYYY-MM-DD HH:MM, defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Message text
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true, trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Balance for all time
    Summary {
        #[arg(short, long, env = "TALLY_USER")]
        user: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Today's report by category
    Today {
        #[arg(short, long, env = "TALLY_USER")]
        user: String,

        /// Reference time (YYYY-MM-DD HH:MM, defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Report for the last 7 days by category
    Week {
        #[arg(short, long, env = "TALLY_USER")]
        user: String,

        /// Reference time (YYYY-MM-DD HH:MM, defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Cli {
    fn store_kind(&self) -> Result<StoreKind> {
        match &self.backend {
            Some(name) => StoreKind::from_str(name).with_context(|| {
                format!("Invalid backend '{}'. Valid backends: csv, sqlite", name)
            }),
            None => Ok(StoreKind::infer(Path::new(&self.store))),
        }
    }

    async fn service(&self) -> Result<BotService<Store>> {
        let kind = self.store_kind()?;
        tracing::debug!(store = %self.store, backend = %kind, "opening ledger store");
        let store = Store::open(kind, &self.store).await?;
        Ok(BotService::new(store).with_currency(self.currency.clone()))
    }

    pub async fn run(self) -> Result<()> {
        match &self.command {
            Commands::Init => {
                let kind = self.store_kind()?;
                Store::init(kind, &self.store).await?;
                println!("Ledger initialized: {} ({})", self.store, kind);
            }

            Commands::Chat { user } => {
                let service = self.service().await?;
                run_chat(&service, user).await?;
            }

            Commands::Send { user, at, text } => {
                let service = self.service().await?;
                let now = resolve_now(at.as_deref())?;
                let reply = service.handle(user, &text.join(" "), now).await?;
                println!("{}", reply);
            }

            Commands::Summary { user, format } => {
                let service = self.service().await?;
                let report = service.summary(user).await?;
                print_report(&report, format)?;
            }

            Commands::Today { user, at, format } => {
                let service = self.service().await?;
                let report = service.today(user, resolve_now(at.as_deref())?).await?;
                print_report(&report, format)?;
            }

            Commands::Week { user, at, format } => {
                let service = self.service().await?;
                let report = service.week(user, resolve_now(at.as_deref())?).await?;
                print_report(&report, format)?;
            }
        }

        Ok(())
    }
}

/// Console transport: every stdin line is one inbound message.
async fn run_chat<S: LedgerStore>(service: &BotService<S>, user: &str) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout.write_all(format!("{}\n", help_text()).as_bytes()).await?;
    stdout.flush().await?;

    tracing::info!(user, "chat session started");
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "/quit" | "/exit") {
            break;
        }

        let now = Local::now().naive_local();
        let reply = service.reply(user, line, now).await;
        stdout.write_all(format!("{}\n", reply.trim_end()).as_bytes()).await?;
        stdout.flush().await?;
    }
    tracing::info!(user, "chat session ended");

    Ok(())
}

fn print_report(report: &WindowReport, format: &str) -> Result<()> {
    print!("{}", render_report(report, format)?);
    Ok(())
}

fn render_report(report: &WindowReport, format: &str) -> Result<String> {
    match format {
        "json" => Ok(ensure_newline(serde_json::to_string_pretty(report)?)),
        "text" => Ok(ensure_newline(report.render())),
        other => bail!("Invalid format '{}'. Valid formats: text, json", other),
    }
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn resolve_now(at: Option<&str>) -> Result<NaiveDateTime> {
    match at {
        Some(text) => parse_timestamp(text)
            .with_context(|| format!("Invalid time '{}'. Use {}", text, TIMESTAMP_FORMAT)),
        None => Ok(Local::now().naive_local()),
    }
}
