//! `meridian`: command-line access to a Meridian server.
//!
//! # Usage
//!
//! ```
//! meridian --url http://localhost:5000 posts
//! meridian post q3-2025-outlook
//! meridian subscribe ada@example.com
//! meridian book --name Ada --email ada@example.com --date 2030-04-01 --time 10:00 --service planning
//! meridian --user user-42 documents
//! ```

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use meridian_client::{
  ApiClient,
  ClientConfig,
  MutationState,
  MutationTracker,
  QueryCache,
  QueryState,
  queries,
};
use meridian_core::{CallerIdentity, appointment::NewAppointment, validate::parse_instant};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "meridian", about = "Command-line client for the Meridian API")]
struct Args {
  /// Path to a TOML config file (url, user).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the server (default: http://localhost:5000).
  #[arg(long, env = "MERIDIAN_URL")]
  url: Option<String>,

  /// Forward this user id as the caller identity. Only honoured when the
  /// server is reached without the identity proxy in front of it.
  #[arg(long, env = "MERIDIAN_USER")]
  user: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List published blog posts.
  Posts,
  /// Show one published post.
  Post { slug: String },
  /// Subscribe an address to the newsletter.
  Subscribe { email: String },
  /// Request a consultation.
  Book {
    #[arg(long)]
    name:    String,
    #[arg(long)]
    email:   String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[arg(long)]
    date:    String,
    #[arg(long)]
    time:    String,
    #[arg(long)]
    service: String,
    #[arg(long)]
    phone:   Option<String>,
    #[arg(long)]
    message: Option<String>,
  },
  /// List the signed-in user's documents.
  Documents,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:  String,
  #[serde(default)]
  user: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags (and their env vars) override the config file.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:5000".to_string());
  let user = args
    .user
    .or_else(|| (!file_cfg.user.is_empty()).then(|| file_cfg.user.clone()));

  let mut config = ClientConfig::new(base_url);
  if let Some(user) = user {
    config = config.with_identity(CallerIdentity::new(user));
  }
  let client = ApiClient::new(config).context("failed to build HTTP client")?;
  let cache = QueryCache::new();

  match args.command {
    Command::Posts => {
      let posts = settled(queries::blog_posts(&cache, &client).await)?;
      for post in posts.iter() {
        let date = post
          .published_at
          .map(|d| d.format("%Y-%m-%d").to_string())
          .unwrap_or_default();
        println!("{date:<10}  {:<40}  {}", post.slug, post.title);
      }
    }
    Command::Post { slug } => {
      let post = settled(queries::blog_post(&cache, &client, &slug).await)?;
      println!("{}\n{} · {}\n\n{}", post.title, post.author, post.category, post.content);
    }
    Command::Subscribe { email } => {
      let mut tracker = MutationTracker::new();
      let sub = done(queries::subscribe(&mut tracker, &cache, &client, &email).await)?;
      println!("subscribed {}", sub.email);
    }
    Command::Book { name, email, date, time, service, phone, message } => {
      let preferred_date =
        parse_instant(&date).ok_or_else(|| anyhow!("invalid date {date:?}"))?;
      let input = NewAppointment {
        name,
        email,
        phone,
        preferred_date,
        preferred_time: time,
        service_type: service,
        message,
      };
      let mut tracker = MutationTracker::new();
      let appt = done(queries::book_appointment(&mut tracker, &cache, &client, &input).await)?;
      println!("requested appointment {} ({})", appt.id, appt.status);
    }
    Command::Documents => {
      let docs = settled(queries::documents(&cache, &client).await)?;
      for doc in docs.iter() {
        println!("{:<10}  {:<16}  {}", doc.status, doc.doc_type, doc.name);
      }
    }
  }

  Ok(())
}

fn settled<T>(state: QueryState<T>) -> Result<std::sync::Arc<T>> {
  match state {
    QueryState::Success(data) => Ok(data),
    QueryState::Error(e) => {
      let message = e.user_message();
      Err(anyhow::Error::new(e).context(message))
    }
    QueryState::Idle | QueryState::Loading => Err(anyhow!("query did not settle")),
  }
}

fn done<T: Clone>(state: &MutationState<T>) -> Result<T> {
  match state {
    MutationState::Success(value) => Ok(value.clone()),
    MutationState::Error(e) => Err(anyhow::Error::new(e.clone()).context(e.user_message())),
    MutationState::Idle | MutationState::Pending => Err(anyhow!("mutation did not settle")),
  }
}
