//! Print an account's likes feed as JSON lines, one page per line.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use likes_feed::config::LikesFeedSettings;
use likes_feed::domain::ports::MutedRepostsStore;
use likes_feed::domain::{Did, FeedRequest, LikesFeedService, LikesFeedServicePorts};
use likes_feed::outbound::did_resolver::HttpIdentityResolver;
use likes_feed::outbound::muted_reposts::{InMemoryMutedRepostsStore, JsonFileMutedRepostsStore};
use likes_feed::outbound::xrpc::{AppViewClient, PdsRecordSource};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `likes-feed` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "likes-feed",
    about = "Page through the posts an account has liked",
    version
)]
struct CliArgs {
    /// DID of the account whose likes are listed.
    #[arg(long, value_name = "did")]
    actor: String,
    /// DID of the viewing account; enables own-profile routing and mutes.
    #[arg(long, value_name = "did")]
    viewer: Option<String>,
    /// Cursor returned by a previous page.
    #[arg(long, value_name = "cursor")]
    cursor: Option<String>,
    /// Items per page.
    #[arg(long, default_value_t = 50)]
    limit: u32,
    /// Maximum number of pages to fetch.
    #[arg(long, default_value_t = 1)]
    pages: u32,
    /// Print only the most recent liked post.
    #[arg(long, conflicts_with_all = ["cursor", "pages"])]
    peek: bool,
    /// Mute reposts by this account for the viewer before fetching.
    #[arg(long = "mute-reposts-by", value_name = "did", requires = "viewer")]
    mute_reposts_by: Vec<String>,
    /// Unmute reposts by this account for the viewer before fetching.
    #[arg(long = "unmute-reposts-by", value_name = "did", requires = "viewer")]
    unmute_reposts_by: Vec<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = LikesFeedSettings::load_from_iter([OsString::from("likes-feed")])
        .context("load likes-feed settings")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("create Tokio runtime")?;
    runtime.block_on(run(args, settings))
}

async fn run(args: CliArgs, settings: LikesFeedSettings) -> Result<()> {
    let service = build_service(&settings)?;
    let viewer = args
        .viewer
        .as_deref()
        .map(|raw| parse_did("viewer", raw))
        .transpose()?;

    if let Some(viewer) = viewer.as_ref() {
        apply_mute_changes(&service, viewer, &args).await?;
    }

    let feed = service.feed_for(viewer.as_ref(), &args.actor)?;
    info!(actor = %feed.actor(), kind = ?feed.kind(), "fetching likes");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.peek {
        let latest = service.peek_latest(viewer.as_ref(), &feed).await;
        serde_json::to_writer(&mut out, &latest).context("write latest item")?;
        writeln!(out)?;
        return Ok(());
    }

    let mut cursor = args.cursor.clone();
    for _ in 0..args.pages {
        let request = FeedRequest::new(cursor.take(), args.limit)?;
        let page = service.fetch_page(viewer.as_ref(), &feed, &request).await;
        serde_json::to_writer(&mut out, &page).context("write feed page")?;
        writeln!(out)?;
        if page.is_final() {
            break;
        }
        cursor = page.cursor;
    }
    Ok(())
}

fn build_service(settings: &LikesFeedSettings) -> Result<LikesFeedService> {
    let http = settings.http_client_settings();
    let identity_resolver = HttpIdentityResolver::new(
        settings.plc_directory_url()?,
        settings.web_did_scheme()?,
        &http,
    )
    .context("build identity resolver")?;
    let record_source = PdsRecordSource::new(&http).context("build PDS client")?;
    let appview = Arc::new(
        AppViewClient::new(&settings.appview_url()?, &http).context("build AppView client")?,
    );
    let muted_reposts_store: Arc<dyn MutedRepostsStore> = match settings.mutes_path.as_deref() {
        Some(path) => Arc::new(
            JsonFileMutedRepostsStore::open(path)
                .with_context(|| format!("open mute store at {}", path.display()))?,
        ),
        None => Arc::new(InMemoryMutedRepostsStore::new()),
    };

    let ports = LikesFeedServicePorts {
        identity_resolver: Arc::new(identity_resolver),
        record_source: Arc::new(record_source),
        post_lookup: appview.clone(),
        actor_likes_source: appview,
        muted_reposts_store,
    };
    Ok(LikesFeedService::new(ports, settings.feature_flags()))
}

async fn apply_mute_changes(service: &LikesFeedService, viewer: &Did, args: &CliArgs) -> Result<()> {
    for (account, muted) in mute_changes(args)? {
        let stored = service
            .set_repost_mute(viewer, &account, muted)
            .await
            .with_context(|| format!("update repost mute for {account}"))?;
        info!(viewer = %viewer, account = %account, muted, total = stored.len(), "updated repost mutes");
    }
    Ok(())
}

/// Requested mute changes in flag order: mutes first, then unmutes.
fn mute_changes(args: &CliArgs) -> Result<Vec<(Did, bool)>> {
    let mutes = args
        .mute_reposts_by
        .iter()
        .map(|raw| ("mute-reposts-by", raw, true));
    let unmutes = args
        .unmute_reposts_by
        .iter()
        .map(|raw| ("unmute-reposts-by", raw, false));
    mutes
        .chain(unmutes)
        .map(|(flag, raw, muted)| parse_did(flag, raw).map(|account| (account, muted)))
        .collect()
}

fn parse_did(argument: &str, raw: &str) -> Result<Did> {
    Did::new(raw).map_err(|error| eyre!("invalid --{argument} `{raw}`: {error}"))
}
