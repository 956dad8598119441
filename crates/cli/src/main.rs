//! Cart checkout CLI.
//!
//! # Usage
//!
//! ```bash
//! # List the cart of the configured user
//! cart-checkout --user alice list
//!
//! # Total of two items
//! cart-checkout total --item 3 --item 7
//!
//! # Check out everything, printing the report as JSON
//! cart-checkout checkout --all --json
//! ```
//!
//! Configuration is read from the environment (and an optional `.env`
//! file); see [`cli::Config`].

use std::process::ExitCode;

use checkout::CartSession;
use clap::{Args, Parser, Subcommand};
use cli::{CliError, Config, Output, Selection, commands};
use common::CartItemId;
use resources::{RestClient, StaticIdentity};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "cart-checkout")]
#[command(author, version, about = "Review a cart and check out selected items")]
struct Cli {
    /// REST base URL (overrides `CART_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Signed-in user name (overrides `CART_USER`)
    #[arg(long, short, global = true)]
    user: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the items in the cart
    List,
    /// Show the total of the selected items
    Total(SelectArgs),
    /// Remove one item from the cart
    Remove {
        /// Cart item ID
        item: CartItemId,
    },
    /// Record the selected items as transactions and remove them from the cart
    Checkout(SelectArgs),
}

#[derive(Args)]
struct SelectArgs {
    /// Select every item in the cart
    #[arg(long, conflicts_with = "item")]
    all: bool,

    /// Select an item by ID (repeatable)
    #[arg(long, short)]
    item: Vec<CartItemId>,
}

impl From<SelectArgs> for Selection {
    fn from(args: SelectArgs) -> Self {
        Selection {
            all: args.all,
            items: args.item,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.api_url.clone(), cli.user.clone());

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli, &config).await {
        Ok(output) => {
            println!("{}", output.text);
            if output.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &Config) -> Result<Output, CliError> {
    let client = RestClient::new(&config.rest_config())?;
    let identity = config
        .user
        .clone()
        .map(StaticIdentity::new)
        .unwrap_or_else(StaticIdentity::anonymous);
    let mut session =
        CartSession::new(client.clone(), client, identity).with_page_size(config.page_size);

    tracing::debug!(api_url = %config.api_url, "session ready");

    match cli.command {
        Commands::List => commands::list(&mut session, cli.json).await,
        Commands::Total(args) => commands::total(&mut session, &args.into(), cli.json).await,
        Commands::Remove { item } => commands::remove(&mut session, item).await,
        Commands::Checkout(args) => {
            commands::checkout(&mut session, &args.into(), cli.json).await
        }
    }
}
