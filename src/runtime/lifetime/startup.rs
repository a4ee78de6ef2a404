use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::RouteSettings;
use crate::auth::build_verifier;
use crate::config::StaticConfig;
use crate::services::{AnalyticsService, LinkService, UserService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub link_service: Arc<LinkService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub user_service: Arc<UserService>,
    pub routes: RouteSettings,
}

/// 准备服务器启动的上下文
/// 包括存储、服务和鉴权配置
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let verifier = build_verifier(&config.auth).context("Failed to build token verifier")?;
    info!("Token verification mode: {}", config.auth.mode.as_ref());

    if config.admin.token.is_empty() {
        warn!("Admin API is disabled (admin.token is empty)");
    } else {
        info!("Admin API available at: {}", crate::api::ADMIN_PREFIX);
    }

    let routes = RouteSettings {
        verifier,
        auth_timeout: Duration::from_secs(config.auth.timeout_secs),
        admin_token: config.admin.token.clone(),
    };

    let context = StartupContext {
        link_service: Arc::new(LinkService::new(storage.clone())),
        analytics_service: Arc::new(AnalyticsService::new(storage.clone())),
        user_service: Arc::new(UserService::new(storage.clone())),
        storage,
        routes,
    };

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
