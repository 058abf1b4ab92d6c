use crate::components::classifier::{require_classifier, ClassifierComponent};
use crate::components::webhook::Notifier;
use crate::components::{ComponentManager, Webhook};
use crate::config::Config;
use crate::error::{component_error, Error, VahtiResult};
use crate::flow::ClassifyCalendarEvent;
use crate::server::{self, AppState};
use crate::shutdown;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,hyper=warn,rig=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Register the components the flow depends on
pub fn register_components(config: Arc<RwLock<Config>>) -> ComponentManager {
    let mut component_manager = ComponentManager::new(config);
    component_manager.register(ClassifierComponent::new());
    component_manager.register(Webhook::new());
    component_manager
}

/// Assemble the flow from initialized components
pub async fn build_flow(component_manager: &ComponentManager) -> VahtiResult<ClassifyCalendarEvent> {
    let classifier_component = component_manager
        .get_component::<ClassifierComponent>()
        .ok_or_else(|| component_error("Classifier component is not registered"))?;
    let classifier = require_classifier(classifier_component).await?;

    let (policy_name, classifier_timeout) = {
        let config = component_manager.get_config();
        let config_read = config.read().await;
        (
            config_read.policy.name.clone(),
            Duration::from_secs(config_read.classifier_timeout_secs),
        )
    };

    let mut flow = ClassifyCalendarEvent::new(classifier)
        .with_policy_name(policy_name)
        .with_classifier_timeout(classifier_timeout);

    if let Some(webhook) = component_manager.get_component::<Webhook>() {
        if let Some(handle) = webhook.get_handle().await {
            info!("Spam notifications go to {}", handle.endpoint());
            let notifier: Arc<dyn Notifier> = Arc::new(handle);
            flow = flow.with_notifier(notifier);
        }
    }

    Ok(flow)
}

/// Initialize components and serve the flow until a shutdown signal arrives
pub async fn start_server(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (listen_addr, notifier_enabled) = {
        let config_read = config.read().await;
        (config_read.listen_addr(), config_read.notifier_enabled())
    };
    if !notifier_enabled {
        info!("WEBHOOK_URL not set, spam verdicts are only logged");
    }

    let component_manager = register_components(Arc::clone(&config));
    component_manager.init_all().await?;

    let flow = build_flow(&component_manager).await?;
    info!("Serving flow '{}'", flow.name());
    let app = server::router(AppState::new(flow));

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", listen_addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from);

    shutdown::shutdown_components(&component_manager).await;

    served?;
    Ok(())
}
