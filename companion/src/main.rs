//! `companion` command: inspect catalogue content, rating statistics, rewards,
//! and level math from the terminal.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use companion::config::{BackendConfig, BackendSettings};
use companion::domain::ports::AuthSession;
use companion::domain::{
    BookPrompt, Catalogue, CatalogueService, Chapter, Exercise, PromptKind, PromptRef,
    PromptTemplate, RatingService, RewardsService, Tiered, level_progress, search_templates,
    seed_remote_catalogue,
};
use companion::outbound::bundled::bundled_catalogue;
use companion::outbound::rest::{
    RestAuthSession, RestCatalogueSeedRepository, RestClient, RestContentRepository,
    RestRatingRepository, RestRewardLedger,
};

/// `companion` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "companion",
    about = "Inspect book companion content, ratings, and rewards",
    version
)]
struct CliArgs {
    /// Skip the backend and answer from bundled content only.
    #[arg(long)]
    offline: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List chapters in reading order.
    Chapters,
    /// List book prompts.
    Prompts {
        #[arg(long, value_name = "number")]
        chapter: Option<u16>,
    },
    /// List structured exercises.
    Exercises {
        #[arg(long, value_name = "number")]
        chapter: Option<u16>,
    },
    /// List or search prompt-library templates.
    Templates {
        #[arg(long)]
        category: Option<String>,
        /// Case-insensitive text matched against title, description, and tags.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the level and progress for a points total.
    Level { points: u64 },
    /// Show aggregated rating statistics for a prompt.
    Stats {
        prompt_id: String,
        /// Prompt kind: `book`, `library`, or `custom`.
        #[arg(long, default_value = "book")]
        kind: String,
    },
    /// Show the signed-in user's points, level, and badges.
    Rewards,
    /// Upsert bundled chapters, prompts, and exercises into the backend.
    Seed,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let bundled = Arc::new(bundled_catalogue().wrap_err("load bundled content")?);
    let client = if args.offline {
        None
    } else {
        backend_client()?
    };

    match args.command {
        Command::Chapters => {
            let content = Content::new(client, bundled);
            emit(&content.chapters().await)
        }
        Command::Prompts { chapter } => {
            let content = Content::new(client, bundled);
            emit(&content.prompts(chapter).await)
        }
        Command::Exercises { chapter } => {
            let content = Content::new(client, bundled);
            emit(&content.exercises(chapter).await)
        }
        Command::Templates { category, search } => {
            let content = Content::new(client, bundled);
            emit(&content.templates(category.as_deref(), search.as_deref()).await)
        }
        Command::Level { points } => emit(&level_progress(points)),
        Command::Stats { prompt_id, kind } => {
            let client = require_backend(client)?;
            let kind: PromptKind = kind.parse()?;
            let prompt = PromptRef::new(prompt_id, kind)?;
            let service = RatingService::new(
                Arc::new(RestRatingRepository::new(client.clone())),
                rewards_service(&client, &bundled),
                Arc::new(RestAuthSession::new(client)),
                Arc::new(DefaultClock),
            );
            emit(&service.rating_stats(&prompt).await?)
        }
        Command::Rewards => {
            let client = require_backend(client)?;
            let auth = RestAuthSession::new(client.clone());
            let user = auth
                .current_user()
                .await?
                .ok_or_else(|| eyre!("sign in first: set COMPANION_ACCESS_TOKEN"))?;
            let summary = rewards_service(&client, &bundled).summary(&user.id).await?;
            emit(&summary)
        }
        Command::Seed => {
            let client = require_backend(client)?;
            let repo = RestCatalogueSeedRepository::new(client);
            let report = seed_remote_catalogue(&repo, &bundled).await?;
            emit(&report)
        }
    }
}

/// Build a client when the backend is configured; `None` means bundled only.
fn backend_client() -> Result<Option<RestClient>> {
    let settings = BackendSettings::load_from_iter([OsString::from("companion")])
        .map_err(|error| eyre!("load backend settings: {error}"))?;
    if settings.backend_url.is_none() {
        info!("backend not configured; serving bundled content");
        return Ok(None);
    }
    let config = BackendConfig::try_from(settings)?;
    info!(
        base_url = %config.base_url(),
        anon_key = %config.anon_key_fingerprint(),
        signed_in = config.access_token().is_some(),
        "backend configured"
    );
    Ok(Some(RestClient::new(config)?))
}

fn require_backend(client: Option<RestClient>) -> Result<RestClient> {
    client.ok_or_else(|| eyre!("this command needs COMPANION_BACKEND_URL and COMPANION_ANON_KEY"))
}

fn rewards_service(client: &RestClient, bundled: &Catalogue) -> RewardsService<RestRewardLedger> {
    RewardsService::new(
        Arc::new(RestRewardLedger::new(client.clone())),
        Arc::new(DefaultClock),
        bundled.chapters().len(),
    )
}

/// Catalogue reads, either tiered through the backend or bundled only.
enum Content {
    Tiered(CatalogueService<RestContentRepository>),
    Bundled(Arc<Catalogue>),
}

impl Content {
    fn new(client: Option<RestClient>, bundled: Arc<Catalogue>) -> Self {
        match client {
            Some(client) => Self::Tiered(CatalogueService::new(
                Arc::new(RestContentRepository::new(client)),
                bundled,
            )),
            None => Self::Bundled(bundled),
        }
    }

    async fn chapters(&self) -> Tiered<Vec<Chapter>> {
        match self {
            Self::Tiered(service) => service.chapters().await,
            Self::Bundled(catalogue) => Tiered::bundled(catalogue.chapters().to_vec()),
        }
    }

    async fn prompts(&self, chapter: Option<u16>) -> Tiered<Vec<BookPrompt>> {
        match self {
            Self::Tiered(service) => service.prompts(chapter).await,
            Self::Bundled(catalogue) => Tiered::bundled(catalogue.prompts(chapter)),
        }
    }

    async fn exercises(&self, chapter: Option<u16>) -> Tiered<Vec<Exercise>> {
        match self {
            Self::Tiered(service) => service.exercises(chapter).await,
            Self::Bundled(catalogue) => Tiered::bundled(catalogue.exercises(chapter)),
        }
    }

    async fn templates(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Tiered<Vec<PromptTemplate>> {
        let listed = match self {
            Self::Tiered(service) => service.templates(category).await,
            Self::Bundled(catalogue) => Tiered::bundled(catalogue.templates(category)),
        };
        match search {
            Some(query) => listed.map(|templates| {
                search_templates(&templates, query)
                    .into_iter()
                    .cloned()
                    .collect()
            }),
            None => listed,
        }
    }
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("render output")?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const BACKEND_VARS: [&str; 4] = [
        "COMPANION_BACKEND_URL",
        "COMPANION_ANON_KEY",
        "COMPANION_ACCESS_TOKEN",
        "COMPANION_TIMEOUT_SECS",
    ];

    #[rstest]
    fn unconfigured_backend_serves_bundled_content() {
        let _guard = lock_env(BACKEND_VARS.map(|name| (name, None::<String>)));

        let client = backend_client().expect("settings load without a backend");
        assert!(client.is_none());
    }

    #[rstest]
    fn configured_backend_builds_a_client() {
        let _guard = lock_env([
            ("COMPANION_BACKEND_URL", Some("https://books.example.test")),
            ("COMPANION_ANON_KEY", Some("anon-123")),
            ("COMPANION_ACCESS_TOKEN", None),
            ("COMPANION_TIMEOUT_SECS", None),
        ]);

        let client = backend_client().expect("settings load");
        assert!(client.is_some());
    }

    #[rstest]
    fn backend_commands_need_a_client() {
        let error = require_backend(None).expect_err("no backend");
        assert!(error.to_string().contains("COMPANION_BACKEND_URL"));
    }
}
