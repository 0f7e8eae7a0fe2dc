use clap::{Parser, Subcommand};
use tracing::info;

use newsdeck::{builtin_sources, relay, Aggregator, AggregatorConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one aggregation pass over the built-in sources and print articles
    Fetch {
        /// Overall article cap for the pass
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Restrict the pass to these source names or ids (repeatable)
        #[arg(long)]
        source: Vec<String>,

        /// Emit JSON instead of a plain listing
        #[arg(long)]
        json: bool,

        /// Route syndication fetches through a relay at this base URL
        #[arg(long)]
        relay: Option<String>,
    },
    /// Serve the same-origin feed relay
    Relay {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Fetch {
            limit,
            source,
            json,
            relay,
        } => run_fetch(limit, source, json, relay),
        Command::Relay { bind } => Ok(run_relay(bind)?),
    }
}

#[tokio::main]
async fn run_fetch(
    limit: usize,
    source_names: Vec<String>,
    json: bool,
    relay_base: Option<String>,
) -> anyhow::Result<()> {
    let config = AggregatorConfig {
        relay_base,
        ..Default::default()
    };

    let mut sources = builtin_sources();
    if !source_names.is_empty() {
        sources.retain(|s| source_names.contains(&s.name) || source_names.contains(&s.id));
    }

    info!(sources = sources.len(), limit, "starting aggregation pass");
    let articles = Aggregator::new(&config).fetch_all(&sources, limit).await;
    info!(count = articles.len(), "aggregation pass finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
    } else {
        for article in &articles {
            println!(
                "{}  [{}] {}",
                article.published_at.format("%Y-%m-%d %H:%M"),
                article.source_name,
                article.title
            );
            if !article.link.is_empty() {
                println!("    {}", article.link);
            }
        }
    }
    Ok(())
}

#[actix_web::main]
async fn run_relay(bind: String) -> std::io::Result<()> {
    relay::serve(&bind, &AggregatorConfig::default()).await
}
