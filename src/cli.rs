//! Command-line configuration and commands

use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::debug;

use kampus_beken::prelude::*;

mod render;

/// Kampus Beken command-line configuration
#[derive(Debug, Parser)]
#[command(name = "kampus", about = "Campus second-hand marketplace", long_about = None)]
pub struct CliConfig {
    /// Directory holding the persisted marketplace slots
    #[arg(short, long, env = "KAMPUS_DATA_DIR", default_value = ".kampus")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// How unparseable prices are handled when posting
    #[arg(long, env = "KAMPUS_PRICE_POLICY", value_enum, default_value = "default-to-zero")]
    pub price_policy: PricePolicy,

    /// Start from an empty catalog and directory instead of the demo data
    #[arg(long)]
    pub no_seed: bool,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Library configuration derived from the CLI options
    pub fn marketplace_config(&self) -> MarketplaceConfig {
        MarketplaceConfig {
            price_policy: self.price_policy,
            seed_defaults: !self.no_seed,
        }
    }
}

/// Marketplace operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the catalog, optionally filtered
    Products(ProductsArgs),

    /// Log in by email or phone
    Login(IdentifierArgs),

    /// Create an account (or log into an existing one) and open a session
    Register(RegisterArgs),

    /// Log out and empty the cart
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List a new product
    Post(PostArgs),

    /// List your own products
    Mine,

    /// Delete one of your products
    Delete {
        /// Product id
        id: ProductId,
    },

    /// Add one unit of a product to the cart
    Add {
        /// Product id
        id: ProductId,
    },

    /// Show the cart
    Cart,

    /// Pay for everything in the cart
    Checkout,
}

/// Catalog filters
#[derive(Debug, Args)]
pub struct ProductsArgs {
    /// Match product or seller names containing this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only products from this campus
    #[arg(short, long)]
    pub campus: Option<Campus>,

    /// Only products in this category
    #[arg(short = 'k', long)]
    pub category: Option<String>,

    /// Price range as `min-max`, or `min-max` with a literal `max` for no upper bound
    #[arg(short, long)]
    pub price: Option<PriceRange>,
}

impl ProductsArgs {
    fn query(&self) -> FilterQuery {
        let mut query = FilterQuery::new();

        if let Some(text) = &self.search {
            query = query.with_text(text);
        }

        if let Some(campus) = self.campus {
            query = query.with_campus(campus);
        }

        if let Some(category) = &self.category {
            query = query.with_category(category);
        }

        if let Some(range) = self.price {
            query = query.with_price_range(range);
        }

        query
    }
}

/// Exactly one of email or phone
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct IdentifierArgs {
    /// Email address
    #[arg(short, long)]
    pub email: Option<String>,

    /// Phone number
    #[arg(short, long)]
    pub phone: Option<String>,
}

impl IdentifierArgs {
    fn channel_and_value(&self) -> (Channel, &str) {
        match (&self.email, &self.phone) {
            (Some(email), _) => (Channel::Email, email),
            (None, Some(phone)) => (Channel::Phone, phone),
            // The argument group requires one; an empty email fails validation.
            (None, None) => (Channel::Email, ""),
        }
    }
}

/// Registration details
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(short, long)]
    pub username: String,

    /// Campus code (UI, ITB, UGM, UNPAD, UNDIP)
    #[arg(short, long)]
    pub campus: String,

    #[command(flatten)]
    pub identifier: IdentifierArgs,
}

/// Listing details
#[derive(Debug, Args)]
pub struct PostArgs {
    /// Product name
    #[arg(short, long)]
    pub name: String,

    /// Price in rupiah
    #[arg(short, long)]
    pub price: String,

    /// Category, e.g. buku or elektronik
    #[arg(short = 'k', long)]
    pub category: String,

    /// Condition, e.g. "Seperti Baru"
    #[arg(short = 'o', long)]
    pub condition: String,
}

/// Command-line errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// A marketplace operation failed.
    #[error(transparent)]
    Marketplace(#[from] MarketplaceError),

    /// Writing output failed.
    #[error("failed to write output")]
    Output(#[from] io::Error),
}

/// Open the marketplace in the configured data directory and run the command.
///
/// # Errors
///
/// Returns a [`CliError`] if the marketplace cannot be opened, the operation
/// fails or output cannot be written.
pub fn run(config: &CliConfig, out: &mut impl Write) -> Result<(), CliError> {
    let store = FileStore::open(config.data_dir.clone()).map_err(MarketplaceError::from)?;
    let mut market = Marketplace::open(store, config.marketplace_config())?;

    debug!(data_dir = %config.data_dir.display(), command = ?config.command, "running command");

    execute(&mut market, &config.command, out)
}

/// Run a single command against an open marketplace.
///
/// # Errors
///
/// Returns a [`CliError`] if the operation fails or output cannot be written.
pub fn execute<S: KeyValueStore>(
    market: &mut Marketplace<S>,
    command: &Command,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Products(args) => {
            let visible = market.apply_filter(&args.query());

            render::write_products(out, &visible, |seller| {
                market.seller_name(seller).to_string()
            })?;
        }
        Command::Login(args) => {
            let (channel, identifier) = args.channel_and_value();
            let request = LoginRequest::new(channel, identifier).map_err(MarketplaceError::from)?;

            match market.login(&request)? {
                LoginOutcome::LoggedIn(user) => {
                    writeln!(out, "Welcome back, {}!", user.username)?;
                }
                LoginOutcome::RegistrationRequired {
                    channel,
                    identifier,
                } => {
                    let flag = match channel {
                        Channel::Email => "--email",
                        Channel::Phone => "--phone",
                    };

                    writeln!(out, "No account found for {identifier}.")?;
                    writeln!(
                        out,
                        "Register with: kampus register {flag} {identifier} --username <NAME> --campus <CAMPUS>"
                    )?;
                }
            }
        }
        Command::Register(args) => {
            let (channel, identifier) = args.identifier.channel_and_value();

            let user = market.register_if_absent(RegisterRequest {
                username: args.username.clone(),
                campus: args.campus.clone(),
                channel,
                identifier: identifier.to_string(),
            })?;

            writeln!(out, "Welcome, {}!", user.username)?;
        }
        Command::Logout => {
            market.logout()?;

            writeln!(out, "Logged out.")?;
        }
        Command::Whoami => match market.session_state() {
            SessionState::LoggedOut => writeln!(out, "Not logged in.")?,
            SessionState::LoggedIn(user) => render::write_user(out, user)?,
        },
        Command::Post(args) => {
            let product = market.post_item(&ProductDraft {
                name: args.name.clone(),
                price: args.price.clone(),
                category: args.category.clone(),
                condition: args.condition.clone(),
            })?;

            writeln!(
                out,
                "Listed #{} {} for {}.",
                product.id,
                product.name,
                format_rupiah(product.price)
            )?;
        }
        Command::Mine => {
            let mine = market.list_my_items()?;

            render::write_products(out, &mine, |seller| {
                market.seller_name(seller).to_string()
            })?;
        }
        Command::Delete { id } => {
            let removed = market.delete_item(*id)?;

            writeln!(out, "Deleted #{} {}.", removed.id, removed.name)?;
        }
        Command::Add { id } => {
            let line = market.add_to_cart(*id)?;

            writeln!(
                out,
                "Added {} to the cart (quantity {}).",
                line.product.name, line.quantity
            )?;
        }
        Command::Cart => render::write_cart(out, market.view_cart())?,
        Command::Checkout => {
            let receipt = market.checkout()?;

            render::write_receipt(out, &receipt)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn parse(args: &[&str]) -> Result<CliConfig, clap::Error> {
        CliConfig::try_parse_from(std::iter::once("kampus").chain(args.iter().copied()))
    }

    fn run_in(market: &mut Marketplace<MemoryStore>, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
        let config = parse(args)?;
        let mut out = Vec::new();

        execute(market, &config.command, &mut out)?;

        Ok(String::from_utf8(out)?)
    }

    fn seeded() -> Result<Marketplace<MemoryStore>, MarketplaceError> {
        Marketplace::open(MemoryStore::new(), MarketplaceConfig::default())
    }

    #[test]
    fn parses_global_options() -> TestResult {
        let config = parse(&["--no-seed", "--price-policy", "reject", "-d", "/tmp/kampus", "cart"])?;

        assert_eq!(config.data_dir, PathBuf::from("/tmp/kampus"));
        assert_eq!(
            config.marketplace_config(),
            MarketplaceConfig {
                price_policy: PricePolicy::Reject,
                seed_defaults: false,
            }
        );
        assert!(matches!(config.command, Command::Cart), "expected cart command");

        Ok(())
    }

    #[test]
    fn login_requires_exactly_one_identifier() {
        assert!(parse(&["login"]).is_err(), "no identifier given");
        assert!(
            parse(&["login", "--email", "a@ui.ac.id", "--phone", "08111"]).is_err(),
            "both identifiers given"
        );
    }

    #[test]
    fn rejects_malformed_price_range() {
        assert!(parse(&["products", "--price", "cheap"]).is_err(), "bad range");
    }

    #[test]
    fn products_lists_filtered_catalog() -> TestResult {
        let mut market = seeded()?;

        let output = run_in(&mut market, &["products", "--price", "50000-max", "--campus", "itb"])?;

        assert!(output.contains("Mouse Wireless Logitech M330"), "{output}");
        assert!(output.contains("Budi (Fisika)"), "{output}");
        assert!(!output.contains("Buku Kalkulus"), "{output}");
        assert!(!output.contains("Gitar"), "{output}");

        Ok(())
    }

    #[test]
    fn products_reports_empty_result() -> TestResult {
        let mut market = seeded()?;

        let output = run_in(&mut market, &["products", "--search", "sepeda"])?;

        assert!(output.contains("No products found."), "{output}");

        Ok(())
    }

    #[test]
    fn unknown_login_suggests_registration() -> TestResult {
        let mut market = seeded()?;

        let output = run_in(&mut market, &["login", "--phone", "08999"])?;

        assert!(output.contains("kampus register --phone 08999"), "{output}");
        assert!(market.current_user().is_none());

        Ok(())
    }

    #[test]
    fn register_post_and_shop() -> TestResult {
        let mut market = seeded()?;

        run_in(
            &mut market,
            &["register", "--username", "Test", "--campus", "ui", "--phone", "08999"],
        )?;

        let whoami = run_in(&mut market, &["whoami"])?;

        assert!(whoami.contains("temp-08999@kampus.com"), "{whoami}");

        let posted = run_in(
            &mut market,
            &["post", "--name", "Jas Lab", "--price", "40000", "--category", "Praktikum", "--condition", "Bersih"],
        )?;

        assert!(posted.starts_with("Listed #7 Jas Lab"), "{posted}");

        run_in(&mut market, &["add", "2"])?;
        let added = run_in(&mut market, &["add", "2"])?;

        assert!(added.contains("quantity 2"), "{added}");

        let cart = run_in(&mut market, &["cart"])?;

        assert!(cart.contains("Mouse Wireless Logitech M330"), "{cart}");

        let receipt = run_in(&mut market, &["checkout"])?;

        assert!(receipt.contains("Total"), "{receipt}");
        assert!(market.view_cart().is_empty());

        Ok(())
    }

    #[test]
    fn gated_command_fails_when_logged_out() -> TestResult {
        let mut market = seeded()?;
        let config = parse(&["add", "2"])?;

        let result = execute(&mut market, &config.command, &mut Vec::new());

        assert!(
            matches!(result, Err(CliError::Marketplace(MarketplaceError::LoginRequired))),
            "expected LoginRequired, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn delete_someone_elses_listing_fails() -> TestResult {
        let mut market = seeded()?;
        run_in(&mut market, &["login", "--email", "andi@ui.ac.id"])?;

        let config = parse(&["delete", "2"])?;
        let result = execute(&mut market, &config.command, &mut Vec::new());

        assert!(
            matches!(result, Err(CliError::Marketplace(MarketplaceError::NotFoundOrForbidden))),
            "expected NotFoundOrForbidden, got {result:?}"
        );

        let deleted = run_in(&mut market, &["delete", "1"])?;

        assert!(deleted.contains("Buku Kalkulus I Edisi 7"), "{deleted}");

        Ok(())
    }
}
