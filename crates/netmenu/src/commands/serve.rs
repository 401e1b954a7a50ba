//! `netmenu serve` -- run the listing server.

use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::TraceLayer;
use tracing::info;

use netmenu_server::{
    register_invalidation_hooks, AppState, HookDispatcher, MemoryRegistry, MemoryStore,
    NetworkEvent, ServerConfig, SiteEnumerator, SiteRegistry, StampCache, StaticTokenPolicy,
};

use crate::cli::ServeArgs;
use crate::error::CliError;

pub async fn run(args: ServeArgs) -> Result<(), CliError> {
    let config = ServerConfig::load(args.config.as_deref())?;

    let registry = match &config.server.seed_file {
        Some(path) => Arc::new(MemoryRegistry::from_seed_file(path)?),
        None => Arc::new(MemoryRegistry::new()),
    };

    let stamps = Arc::new(StampCache::new(
        Arc::new(MemoryStore::new()),
        Duration::from_secs(config.menu.stamp_ttl_secs),
    ));

    let dispatcher = Arc::new(HookDispatcher::new());
    register_invalidation_hooks(&dispatcher, Arc::clone(&stamps), &config.menu.watched_plugins);
    registry.attach_dispatcher(Arc::clone(&dispatcher));

    let state = Arc::new(AppState::new(
        SiteEnumerator::new(Arc::clone(&registry) as Arc<dyn SiteRegistry>),
        stamps,
        Arc::new(StaticTokenPolicy::new(config.server.admin_tokens.clone())),
        config.menu.clone(),
        config.listing_url(),
    ));

    let app = netmenu_server::router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Deactivation cleanup: retire the shared stamp on the way out.
    dispatcher.dispatch(&NetworkEvent::Deactivating);
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}
