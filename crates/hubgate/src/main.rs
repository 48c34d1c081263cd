//! CLI for hubgate
//!
//! Subcommands:
//! - `topics`: print the topics a principal is allowed
//! - `token`: print a publish or subscribe token for a principal
//! - `cookie`: print the `Set-Cookie` header carrying the subscriber token
//! - `publish`: publish JSON data to the configured hub

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use hubgate_config::{Settings, load_config, load_config_from};
use hubgate_hub::{
    CookieWriter, HeaderCookieJar, HttpConnector, HubAuthority, Publisher, StaticIdentity,
};
use hubgate_topics::{AuthorizationResolver, Principal, TopicAggregator};
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "hubgate", about = "Scoped hub tokens and publishing")]
struct Cli {
    /// Config file layered over config/default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the allowed topics, one per line
    Topics {
        /// Customer id; omit or pass 0 for a guest
        #[arg(long)]
        customer: Option<u64>,
    },
    /// Print a signed token
    Token {
        #[arg(long)]
        customer: Option<u64>,
        #[arg(long, value_enum, default_value_t = TokenScope::Subscribe)]
        scope: TokenScope,
    },
    /// Print the Set-Cookie header with the subscriber token
    Cookie {
        #[arg(long)]
        customer: Option<u64>,
    },
    /// Publish an update and print the message id
    Publish {
        #[arg(long)]
        topic: String,
        /// JSON payload; anything that is not valid JSON is sent as a string
        #[arg(long)]
        data: String,
        #[arg(long)]
        customer: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TokenScope {
    Publish,
    Subscribe,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    hubgate_utils::logging::init(&settings.log.level);
    debug!("loaded {:?}", settings.hub);

    if let Err(e) = run(cli.command, settings).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(command: Command, settings: Settings) -> Result<(), Box<dyn Error>> {
    let topics = Arc::new(TopicAggregator::from_settings(&settings.topics));

    match command {
        Command::Topics { customer } => {
            let resolver = AuthorizationResolver::new(topics);
            for topic in resolver.allowed_topics(Principal::from_id(customer)) {
                println!("{topic}");
            }
        }
        Command::Token { customer, scope } => {
            let cookies = Arc::new(HeaderCookieJar::new());
            let authority = authority(&settings, topics, customer, cookies)?;
            let principal = Principal::from_id(customer);
            let token = match scope {
                TokenScope::Publish => authority.hub(principal)?.token_provider().token()?,
                TokenScope::Subscribe => authority.token_provider(principal)?.token()?,
            };
            println!("{token}");
        }
        Command::Cookie { customer } => {
            let cookies = Arc::new(HeaderCookieJar::new());
            let authority = authority(&settings, topics, customer, cookies.clone())?;
            authority.set_authorization_header()?;
            for header in cookies.headers() {
                println!("Set-Cookie: {header}");
            }
        }
        Command::Publish {
            topic,
            data,
            customer,
        } => {
            let payload: serde_json::Value =
                serde_json::from_str(&data).unwrap_or(serde_json::Value::String(data));
            let cookies = Arc::new(HeaderCookieJar::new());
            let authority = authority(&settings, topics.clone(), customer, cookies)?;
            let publisher = Publisher::new(
                Arc::new(authority),
                Arc::new(StaticIdentity::new(customer)),
                topics,
            );
            let message_id = publisher.execute(&topic, &payload).await?;
            println!("{message_id}");
        }
    }

    Ok(())
}

fn authority(
    settings: &Settings,
    topics: Arc<TopicAggregator>,
    customer: Option<u64>,
    cookies: Arc<dyn CookieWriter>,
) -> Result<HubAuthority, Box<dyn Error>> {
    let connector = HttpConnector::new(Duration::from_secs(settings.hub.request_timeout_secs))?;

    Ok(HubAuthority::new(
        Arc::new(settings.hub.clone()),
        AuthorizationResolver::new(topics),
        Arc::new(connector),
        Arc::new(StaticIdentity::new(customer)),
        cookies,
    ))
}
