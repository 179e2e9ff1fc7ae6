//! Form Concierge server
//!
//! Loads configuration, wires the adapters and serves the HTTP API while
//! the session sweeper runs in the background.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use form_concierge::adapters::advisory::{OpenAiAdvisoryConfig, OpenAiAdvisoryService};
use form_concierge::adapters::document::{LocalFileLifecycle, MarkdownDocumentRenderer};
use form_concierge::adapters::http::{build_app, ConciergeAppState};
use form_concierge::adapters::storage::InMemorySessionStore;
use form_concierge::application::{ConversationOrchestrator, SessionSweeper, SessionSweeperConfig};
use form_concierge::config::{AdvisoryConfig, AppConfig, FormsConfig};
use form_concierge::domain::forms::{RegistryError, SchemaRegistry};
use form_concierge::domain::resolution::FormResolver;
use form_concierge::domain::session::SessionMachine;
use form_concierge::ports::{AdvisoryService, SessionStore};
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    config.validate()?;

    let registry = Arc::new(load_registry(&config.forms)?);
    info!(forms = registry.len(), "Form catalogue loaded");

    let advisory = build_advisory(&config.advisory)?;
    let resolver = FormResolver::new(
        registry.clone(),
        advisory,
        config.advisory.resolver_settings(),
    );

    let store: Arc<dyn SessionStore> =
        Arc::new(InMemorySessionStore::new(config.sessions.max_log_turns));
    let orchestrator = ConversationOrchestrator::new(
        store.clone(),
        SessionMachine::new(Arc::new(resolver)),
    );

    let output_dir = config.documents.output_dir.clone();
    let state = ConciergeAppState {
        orchestrator: Arc::new(orchestrator),
        registry,
        store: store.clone(),
        renderer: Arc::new(MarkdownDocumentRenderer::new(output_dir.clone())),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = SessionSweeper::new(
        store,
        Arc::new(LocalFileLifecycle::new(output_dir)),
        SessionSweeperConfig::default()
            .with_interval(config.sessions.sweep_interval())
            .with_max_idle(config.sessions.max_idle()),
    )
    .spawn(shutdown_rx);

    let app = build_app(state, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Form concierge listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;

    shutdown_tx.send(true).ok();
    sweeper.await?;
    Ok(())
}

fn load_registry(config: &FormsConfig) -> Result<SchemaRegistry, RegistryError> {
    match &config.catalogue_path {
        Some(path) => {
            info!(path = %path.display(), "Loading form catalogue");
            SchemaRegistry::from_yaml_file(path)
        }
        None => SchemaRegistry::builtin(),
    }
}

fn build_advisory(
    config: &AdvisoryConfig,
) -> Result<Option<Arc<dyn AdvisoryService>>, Box<dyn std::error::Error>> {
    let Some(api_key) = config.api_key.as_ref().filter(|_| config.is_enabled()) else {
        warn!("No advisory API key configured; resolving forms by keyword only");
        return Ok(None);
    };

    let service = OpenAiAdvisoryService::new(
        OpenAiAdvisoryConfig::new(api_key.expose_secret().clone())
            .with_base_url(config.base_url.clone())
            .with_model(config.model.clone())
            .with_timeout(config.timeout()),
    )?;
    info!(model = %config.model, "Advisory service enabled");
    Ok(Some(Arc::new(service)))
}
