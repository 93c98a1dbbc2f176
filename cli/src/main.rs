//! Demo command line for the What's on the Menu API.
//!
//! Searches dishes for a fixed query and prints the result together with the
//! calls the token has left today.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use menus_core::{ApiResponse, MenusClient, Pagination, DEFAULT_BASE_URL};

#[derive(Debug, Parser)]
#[command(version, about = "Query the NYPL What's on the Menu API", long_about = None)]
struct Cli {
    /// Your API token; ask NYPL for one: https://github.com/NYPL/menus-api#tokens
    token: String,
    /// Base URL of the API.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Dish name to search for.
    #[arg(long, default_value = "meatballs")]
    query: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut api = MenusClient::with_base_url(&cli.token, &cli.base_url);
    tracing::info!(base_url = %api.base_url(), query = %cli.query, "searching dishes");

    match api.get_dishes_search(&cli.query, Pagination::default())? {
        ApiResponse::Json(dishes) => println!("{}", serde_json::to_string_pretty(&dishes)?),
        ApiResponse::NoResult => println!("no result"),
    }

    println!("Rate limit remaining: {}", api.rate_limit_remaining()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_the_only_required_argument() {
        let cli = Cli::try_parse_from(["whatsonthemenu", "abc"]).unwrap();
        assert_eq!(cli.token, "abc");
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert_eq!(cli.query, "meatballs");
    }

    #[test]
    fn missing_token_is_rejected() {
        assert!(Cli::try_parse_from(["whatsonthemenu"]).is_err());
    }

    #[test]
    fn overrides_are_accepted() {
        let cli = Cli::try_parse_from([
            "whatsonthemenu",
            "abc",
            "--base-url",
            "http://127.0.0.1:3000",
            "--query",
            "apple pie",
        ])
        .unwrap();
        assert_eq!(cli.base_url, "http://127.0.0.1:3000");
        assert_eq!(cli.query, "apple pie");
    }
}
