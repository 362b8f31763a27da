//! Headless client for the bakery API: log in, then print a dashboard
//! snapshot or a resource listing.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;
use std::time::Duration;

use bakehouse::auth::AuthStore;
use bakehouse::config::{self, DashboardConfig};
use bakehouse::model::{Entity, LoginRequest};
use bakehouse::notify::TracingNotifier;
use bakehouse::resource::ResourceStore;
use bakehouse::App;
use clap::{Parser, Subcommand, ValueEnum};
use mockable::{DefaultClock, DefaultEnv};
use serde::Serialize;
use tokio::runtime::Builder;
use tracing_subscriber::EnvFilter;
use url::Url;

/// `bakehouse` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "bakehouse", about = "Bakery dashboard client", version)]
struct CliArgs {
    /// API base URL. Falls back to `BAKEHOUSE_API_URL`.
    #[arg(long = "api-url", value_name = "url")]
    api_url: Option<Url>,
    /// Request timeout in milliseconds.
    #[arg(long = "timeout-ms", value_name = "ms")]
    timeout_ms: Option<u64>,
    /// Account email; logs in before running the command.
    #[arg(long, value_name = "email", requires = "password")]
    email: Option<String>,
    #[arg(long, value_name = "password")]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print revenue, expenses, net profit and weekday sales.
    Dashboard,
    /// List one collection.
    List {
        #[arg(value_enum)]
        resource: Resource,
        /// Server-side search term.
        #[arg(long)]
        search: Option<String>,
    },
    /// Count open orders due within the configured window.
    DueSoon,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Resource {
    Products,
    Expenses,
    Customers,
    Orders,
}

fn main() -> io::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;

    let mut config = DashboardConfig::from_env(&DefaultEnv::new())
        .map_err(|error| io::Error::other(format!("load configuration: {error}")))?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.request_timeout = Duration::from_millis(timeout_ms);
    }
    if config.api_url.cannot_be_a_base() {
        return Err(io::Error::other(format!(
            "{} is not a valid API base URL",
            config::API_URL_ENV
        )));
    }

    let app = App::connect(config, Arc::new(TracingNotifier), Arc::new(DefaultClock))
        .map_err(|error| io::Error::other(format!("build client: {error}")))?;

    if let (Some(email), Some(password)) = (args.email, args.password) {
        login(&app.auth, email, password).await?;
    }

    match args.command {
        Command::Dashboard => {
            app.dashboard.refresh().await;
            print_json(&app.dashboard.summary())
        }
        Command::List { resource, search } => {
            let search = search.as_deref();
            match resource {
                Resource::Products => list(&app.products, search).await,
                Resource::Expenses => list(&app.expenses, search).await,
                Resource::Customers => list(&app.customers, search).await,
                Resource::Orders => list(app.orders.resource(), search).await,
            }
        }
        Command::DueSoon => {
            let watch = app.due_soon();
            app.orders.fetch_all(None).await;
            println!("due_soon={}", watch.count());
            watch.hover();
            Ok(())
        }
    }
}

async fn login(auth: &AuthStore, email: String, password: String) -> io::Result<()> {
    auth.login(LoginRequest { email, password }).await;
    let state = auth.state();
    match state.error {
        Some(error) => Err(io::Error::other(format!("login failed: {error}"))),
        None => Ok(()),
    }
}

async fn list<E: Entity>(store: &ResourceStore<E>, search: Option<&str>) -> io::Result<()> {
    store.fetch_all(search).await;
    let state = store.state();
    if let Some(error) = state.error {
        return Err(io::Error::other(format!(
            "list {}: {error}",
            E::KIND.plural
        )));
    }
    print_json(&state.items)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{text}");
    Ok(())
}
