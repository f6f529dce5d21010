//! Suresh CLI - session store migration and cart inspection.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table the storefront keeps carts in
//! suresh-cli migrate
//!
//! # Work with a cart stored in a local JSON file
//! suresh-cli cart --file cart.json add b1 "Road Bike" 1200
//! suresh-cli cart --file cart.json show
//! suresh-cli cart --file cart.json --site athlete checkout
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the session store table
//! - `cart` - Show, add, remove or check out a file-backed cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use suresh_core::CHECKOUT_DELAY;
use suresh_storefront::Site;

mod commands;

use commands::cart::CartAction;

#[derive(Parser)]
#[command(name = "suresh-cli")]
#[command(author, version, about = "Suresh sites CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session store table
    Migrate,
    /// Inspect or change a cart kept in a JSON file
    Cart {
        /// Storage file (created on first write)
        #[arg(short, long, default_value = "cart.json")]
        file: PathBuf,

        /// Which site's cart to use (`bikes` or `athlete`)
        #[arg(short, long, default_value = "bikes")]
        site: Site,

        #[command(subcommand)]
        action: CartCommand,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: String,
        /// Product name
        name: String,
        /// Unit price, e.g. `1200` or `45.50`
        price: String,
    },
    /// Remove a product line
    Remove {
        /// Product id
        id: String,
    },
    /// Check out: wait for the checkout delay, then clear the cart
    Checkout {
        /// Delay before the cart is cleared, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

impl From<CartCommand> for CartAction {
    fn from(command: CartCommand) -> Self {
        match command {
            CartCommand::Show => Self::Show,
            CartCommand::Add { id, name, price } => Self::Add { id, name, price },
            CartCommand::Remove { id } => Self::Remove { id },
            CartCommand::Checkout { delay_ms } => Self::Checkout {
                delay: delay_ms.map_or(CHECKOUT_DELAY, Duration::from_millis),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Cart { file, site, action } => {
            commands::cart::run(&file, site, action.into()).await?;
        }
    }
    Ok(())
}
