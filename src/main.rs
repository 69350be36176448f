//! techvault - command-line TechVault client
//!
//! Drives the client core against a live backend: sign in, search the vault,
//! favorite and rate resources.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use techvault_client::application::{ClientContext, MutationOutcome, SubmitRating, ToggleFavorite};
use techvault_client::config::AppConfig;
use techvault_client::domain::foundation::{ResourceId, StarRating};
use techvault_client::domain::routing::{Route, RouteDecision};
use techvault_client::ports::DevLoginRequest;
use techvault_client::telemetry;

/// techvault - browse, rate and favorite shared knowledge resources
#[derive(Parser, Debug)]
#[command(name = "techvault")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the restored session and where the home route leads
    Status,

    /// Sign in through the backend's development login
    DevLogin {
        #[arg(long)]
        telegram_id: i64,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        username: Option<String>,
    },

    /// Sign out and forget the stored credential
    Logout,

    /// Search the vault
    Search {
        /// Search text
        text: String,
    },

    /// Toggle a resource in your favorites
    Favorite {
        /// Resource id
        id: ResourceId,
    },

    /// Rate a resource
    Rate {
        /// Resource id
        id: ResourceId,

        /// Stars (1-5)
        #[arg(value_parser = parse_stars)]
        stars: StarRating,
    },

    /// Show resource details
    Show {
        /// Resource id
        id: ResourceId,
    },
}

fn parse_stars(value: &str) -> Result<StarRating, String> {
    let stars: u8 = value.parse().map_err(|_| format!("'{}' is not a number", value))?;
    StarRating::new(stars).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    telemetry::init_tracing(&config.client);

    let context = ClientContext::build(config)
        .await
        .context("failed to initialise client")?;

    let result = run(&context, cli.command).await;
    for notice in context.notices().active() {
        eprintln!("! {}", notice.message);
    }
    result
}

async fn run(context: &ClientContext, command: Commands) -> Result<()> {
    match command {
        Commands::Status => {
            match context.session().current().user() {
                Some(user) => println!("Signed in as {}", user.display_name()),
                None => println!("Signed out"),
            }
            println!("{} -> {:?}", Route::Home, context.route(Route::Home));
        }
        Commands::DevLogin {
            telegram_id,
            first_name,
            username,
        } => {
            let request = DevLoginRequest {
                telegram_id,
                first_name,
                username,
            };
            let route = context.login().dev_login(&request, None).await?;
            println!("Signed in; continue at {}", route);
        }
        Commands::Logout => {
            context.login().logout().await;
            println!("Signed out");
        }
        Commands::Search { text } => {
            require_session(context, Route::VaultSearch)?;
            let search = context.search();
            search.set_input(text);
            let state = search.wait_settled().await;
            if let Some(error) = state.error() {
                bail!("search failed: {}", error);
            }
            if state.is_empty_result() {
                println!("No results found");
            }
            for resource in state.results() {
                println!(
                    "{}  {:<40} {} ({})",
                    resource.id,
                    resource.title,
                    resource.average_rating,
                    resource.ratings_count
                );
            }
        }
        Commands::Favorite { id } => {
            require_session(context, Route::ResourceDetails(id))?;
            let details = context.resource_details().load(id).await?;
            let outcome = context
                .mutator()
                .apply(&details.interaction, ToggleFavorite::new(id))
                .await;
            ensure_confirmed(outcome)?;
            let state = details.interaction.get();
            println!(
                "{} {}",
                details.resource.title,
                if state.is_favorite { "added to favorites" } else { "removed from favorites" }
            );
        }
        Commands::Rate { id, stars } => {
            require_session(context, Route::ResourceDetails(id))?;
            let details = context.resource_details().load(id).await?;
            let outcome = context
                .mutator()
                .apply(&details.interaction, SubmitRating::new(id, stars))
                .await;
            ensure_confirmed(outcome)?;
            let state = details.interaction.get();
            println!(
                "Rated {} {}; average {} from {} ratings",
                details.resource.title, stars, state.average_rating, state.ratings_count
            );
        }
        Commands::Show { id } => {
            require_session(context, Route::ResourceDetails(id))?;
            let details = context.resource_details().load(id).await?;
            let state = details.interaction.get();
            println!("{}", details.resource.title);
            println!("  type:       {}", details.resource.resource_type.label());
            println!("  technology: {}", details.technology_name);
            println!("  level:      {}", details.skill_level_name);
            println!("  file:       {}", details.file_url);
            println!(
                "  rating:     {} ({} ratings), yours: {}",
                state.average_rating,
                state.ratings_count,
                state
                    .user_rating
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!("  favorite:   {}", if state.is_favorite { "yes" } else { "no" });
        }
    }
    Ok(())
}

fn require_session(context: &ClientContext, route: Route) -> Result<()> {
    match context.route(route) {
        RouteDecision::Render(_) => Ok(()),
        RouteDecision::RedirectToLogin { return_to } => {
            bail!("sign in first (techvault dev-login) to open {}", return_to)
        }
        RouteDecision::Loading => bail!("session is still loading"),
    }
}

fn ensure_confirmed(outcome: MutationOutcome) -> Result<()> {
    match outcome {
        MutationOutcome::Confirmed => Ok(()),
        MutationOutcome::RolledBack { error } => Err(error.into()),
        other => bail!("mutation did not complete: {:?}", other),
    }
}
