mod api;
mod cache;
mod format;
mod page;
mod topic;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use crate::api::{KeywordRecord, PoemClient};
use crate::cache::{ResponseCache, ResponseCacheKey};
use crate::format::RenderedPoem;
use crate::page::{DEFAULT_STYLESHEET, PageContext};
use crate::topic::{LineCount, Topic};

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Deserialize, Debug, Default)]
struct Environment {
    poem_api_url: Option<String>,
    poem_request_timeout_secs: Option<u64>,
}

#[derive(StructOpt, Debug)]
#[structopt(
    name = "hxh-poem",
    about = "Generate Nôm-style Vietnamese poems and render them with their glossary"
)]
struct Args {
    /// Path to a TOML configuration file
    #[structopt(short = "c", long)]
    config: Option<PathBuf>,

    /// Base URL of the poem backend
    #[structopt(long)]
    api_url: Option<String>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Generate a poem about a topic and render it as HTML
    Generate {
        /// What the poem should be about (2 to 100 characters)
        topic: String,

        /// Number of lines (4 or 8)
        #[structopt(short = "n", long, default_value = "8")]
        num_lines: LineCount,

        /// Write the result to this file instead of stdout
        #[structopt(short, long)]
        output: Option<PathBuf>,

        /// Emit the HTML fragments as JSON instead of a full page
        #[structopt(long)]
        fragments: bool,

        /// Reuse the last stored poem for this topic and line count
        #[structopt(long)]
        reuse_cached: bool,
    },
    /// Check that the poem backend is up
    Health,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
struct Config {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    stylesheet: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
struct Settings {
    api_url: String,
    timeout: Option<Duration>,
}

impl Settings {
    /// Command line beats environment, which beats the config file.
    fn resolve(args: &Args, environment: Environment, config: &Config) -> Self {
        let api_url = args
            .api_url
            .clone()
            .or(environment.poem_api_url)
            .or_else(|| config.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let timeout = environment
            .poem_request_timeout_secs
            .or(config.request_timeout_secs)
            .map(Duration::from_secs);

        Self { api_url, timeout }
    }
}

#[derive(Serialize)]
struct FragmentsOutput<'a> {
    #[serde(flatten)]
    rendered: &'a RenderedPoem,
    keywords_used: &'a [KeywordRecord],
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let environment = envy::from_env::<Environment>()?;
    let args = Args::from_args();

    let config: Config = match &args.config {
        Some(path) => toml::from_str(
            &tokio::fs::read_to_string(path)
                .await
                .context("Failed to read config file")?,
        )
        .context("Failed to parse config TOML")?,
        None => Config::default(),
    };

    let settings = Settings::resolve(&args, environment, &config);
    let client = PoemClient::new(&settings.api_url, settings.timeout)
        .context("Failed to build HTTP client")?;

    match args.command {
        Command::Health => check_health(&client).await,
        Command::Generate {
            topic,
            num_lines,
            output,
            fragments,
            reuse_cached,
        } => {
            let stylesheet = match &config.stylesheet {
                Some(path) => tokio::fs::read_to_string(path)
                    .await
                    .context("Failed to read stylesheet")?,
                None => DEFAULT_STYLESHEET.to_owned(),
            };
            let request = GenerateCommand {
                num_lines,
                output,
                fragments,
                reuse_cached,
                stylesheet,
            };
            let cache = ResponseCache::new()
                .await
                .inspect_err(|err| warn!(error = %err, "Response cache unavailable"))
                .ok();
            request.run(&client, cache.as_ref(), &topic).await
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn check_health(client: &PoemClient) -> anyhow::Result<()> {
    let health = client
        .health()
        .await
        .context("Poem backend health check failed")?;
    println!("{}: {}", health.status, health.message);
    Ok(())
}

struct GenerateCommand {
    num_lines: LineCount,
    output: Option<PathBuf>,
    fragments: bool,
    reuse_cached: bool,
    stylesheet: String,
}

impl GenerateCommand {
    /// Validation runs before the cache or the backend is touched.
    async fn run(
        self,
        client: &PoemClient,
        cache: Option<&ResponseCache>,
        raw_topic: &str,
    ) -> anyhow::Result<()> {
        let topic = Topic::parse(raw_topic)?;
        let context = PageContext {
            stylesheet: &self.stylesheet,
            ..PageContext::new(topic.as_str())
        };

        let cache_key = ResponseCacheKey::new(&topic, self.num_lines);

        let cached = match (cache, self.reuse_cached) {
            (Some(cache), true) => cache.get(&cache_key).await,
            _ => None,
        };

        let poem = if let Some(cached_poem) = cached {
            eprintln!("Using cached poem");
            cached_poem
        } else {
            eprintln!("Generating poem about “{}”…", topic.as_str());
            match client.generate(&topic, self.num_lines).await {
                Ok(poem) => {
                    if let Some(cache) = cache {
                        cache.insert(cache_key, &poem).await;
                    }
                    poem
                }
                Err(err) => {
                    error!(error = %err, "Error generating poem");
                    if let Some(path) = &self.output {
                        tokio::fs::write(path, context.render_error_page(err.user_message()))
                            .await
                            .context("Failed to write error page")?;
                    }
                    anyhow::bail!(err.user_message());
                }
            }
        };

        let rendered = format::format_response(&poem.text);
        let document = if self.fragments {
            let payload = FragmentsOutput {
                rendered: &rendered,
                keywords_used: &poem.keywords_used,
            };
            serde_json::to_string_pretty(&payload)?
        } else {
            context.render_poem_page(&rendered)
        };

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, document)
                    .await
                    .context("Failed to write output file")?;
                eprintln!("Wrote {}", path.display());
            }
            None => println!("{document}"),
        }

        Ok(())
    }
}
