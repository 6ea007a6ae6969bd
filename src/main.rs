use anyhow::{Context, Result};
use clap::Parser;
use newsflash::api::{build_http_client, EnvTokenProvider, NewsClient};
use newsflash::config::Config;
use newsflash::headlines::{HeadlinesController, ScreenState, Topic};
use newsflash::repository::RemoteNewsRepository;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Get the config file path (~/.config/newsflash/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("newsflash")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "newsflash", about = "Top headlines and news search from the terminal")]
struct Args {
    /// Search query. Omit for top headlines.
    query: Vec<String>,

    /// Config file (defaults to ~/.config/newsflash/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Two-letter language code
    #[arg(long)]
    lang: Option<String>,

    /// Country filter for top headlines
    #[arg(long)]
    country: Option<String>,

    /// Maximum number of articles
    #[arg(long)]
    max: Option<u32>,

    /// Read queries from stdin, one per line, searching as you type
    #[arg(short, long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for results
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    config.apply_env();
    if let Some(lang) = args.lang.clone() {
        config.language = lang;
    }
    if let Some(country) = args.country.clone() {
        config.country = Some(country);
    }
    if let Some(max) = args.max {
        config.max_articles = max;
    }
    tracing::debug!(?config, "Effective configuration");

    // Composition root: everything is wired here by hand
    let http = build_http_client().context("Failed to build HTTP client")?;
    let tokens = Arc::new(EnvTokenProvider::new(config.api_token.clone()));
    let client = NewsClient::new(http, &config.base_url(), tokens)
        .with_context(|| format!("Invalid API base URL: {}", config.base_url()))?
        .with_timeout(config.request_timeout());
    let repository = Arc::new(RemoteNewsRepository::new(Arc::new(client)));
    let controller = HeadlinesController::new(repository, config.controller_settings());

    if args.interactive {
        return run_interactive(&controller).await;
    }

    let query = args.query.join(" ");
    if query.trim().is_empty() {
        controller.load_initial_data().await;
    } else {
        controller.set_query(query);
        controller.refresh().await;
    }

    let state = controller.state();
    print_state(&controller, &state);
    if matches!(state, ScreenState::Error(_)) {
        std::process::exit(1);
    }
    Ok(())
}

/// Line-oriented driver: each line is a query edit. `:r` refreshes,
/// `:t <topic>` toggles a topic, `:q` quits.
async fn run_interactive(controller: &HeadlinesController) -> Result<()> {
    let mut updates = controller.subscribe();
    controller.load_initial_data().await;
    let state = updates.borrow_and_update().clone();
    print_state(controller, &state);

    println!(
        "Type to search, ':t <topic>' to toggle a topic ({}), ':r' to refresh, ':q' to quit.",
        Topic::ALL
            .iter()
            .map(|t| t.key())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match line.trim() {
                    ":q" => break,
                    ":r" => controller.refresh().await,
                    cmd if cmd.starts_with(":t") => {
                        match cmd.trim_start_matches(":t").parse::<Topic>() {
                            Ok(topic) => controller.toggle_topic(topic),
                            Err(e) => println!("{}", e),
                        }
                    }
                    _ => controller.query_changed(line.as_str()),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print_state(controller, &state);
            }
        }
    }

    Ok(())
}

fn print_state(controller: &HeadlinesController, state: &ScreenState) {
    match state {
        ScreenState::Idle => {}
        ScreenState::Loading(kind) => println!("Loading ({:?})...", kind),
        ScreenState::Loaded(items) if items.is_empty() => {
            println!("{}", controller.empty_message());
        }
        ScreenState::Loaded(items) => {
            for (n, item) in items.iter().enumerate() {
                println!("{:>2}. {}", n + 1, item.title);
                match &item.published_relative {
                    Some(when) => println!("    {} · {}", item.source, when),
                    None => println!("    {}", item.source),
                }
                if let Some(url) = &item.article_url {
                    println!("    {}", url);
                }
            }
        }
        ScreenState::Error(err) => {
            eprintln!("Error: {}", err.message());
            eprintln!("Run again (or ':r' in interactive mode) to retry.");
        }
    }
}
