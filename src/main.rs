//! Staff helpdesk server.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Instant;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use helpdesk_api::{build_router, AppState};
use helpdesk_core::config::AppConfig;
use helpdesk_core::error::AppError;
use helpdesk_database::stores::{
    AnnouncementStore, MessageStore, NotificationStore, TicketStore, UserStore,
};
use helpdesk_database::DatabasePool;
use helpdesk_realtime::RealtimeHub;
use helpdesk_service::{AnnouncementService, NotificationService, TicketService, UserDirectory};
use helpdesk_worker::MaintenanceScheduler;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration for the current environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("HELPDESK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting staff helpdesk v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Storage backend ──────────────────────────────────
    let (stores, db_pool) = if config.database.is_memory() {
        tracing::info!("No database configured, using in-memory stores");
        (Stores::in_memory(), None)
    } else {
        tracing::info!("Connecting to database...");
        let pool = DatabasePool::connect(&config.database).await?;

        tracing::info!("Running database migrations...");
        pool.run_migrations().await?;

        (Stores::postgres(&pool), Some(pool))
    };

    // ── Step 2: User directory ───────────────────────────────────
    let directory = Arc::new(UserDirectory::new(
        stores.users.clone(),
        &config.notifications,
    ));

    // ── Step 3: Realtime hub ─────────────────────────────────────
    tracing::info!("Initializing realtime hub...");
    let hub = Arc::new(RealtimeHub::new(config.realtime.clone()));
    hub.start_heartbeat();

    // ── Step 4: Services ─────────────────────────────────────────
    tracing::info!("Initializing services...");
    let notification_service = Arc::new(NotificationService::new(
        stores.notifications.clone(),
        stores.users.clone(),
        Arc::clone(&directory),
        hub.clone(),
        config.notifications.clone(),
    ));
    let ticket_service = Arc::new(TicketService::new(
        stores.tickets.clone(),
        stores.messages.clone(),
        Arc::clone(&notification_service),
        Arc::clone(&directory),
        hub.clone(),
    ));
    let announcement_service = Arc::new(AnnouncementService::new(
        stores.announcements.clone(),
        Arc::clone(&notification_service),
    ));
    tracing::info!("Services initialized");

    // ── Step 5: Maintenance scheduler ────────────────────────────
    let scheduler = if config.worker.enabled {
        tracing::info!("Starting maintenance scheduler...");
        let scheduler =
            MaintenanceScheduler::new(Arc::clone(&notification_service), config.worker.clone())
                .await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Maintenance scheduler disabled");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = AppState {
        config: Arc::new(config.clone()),
        directory,
        hub: Arc::clone(&hub),
        notification_service,
        ticket_service,
        announcement_service,
        started_at: Instant::now(),
    };

    let app = build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Helpdesk server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 8: Stop background tasks ────────────────────────────
    if let Some(mut scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    hub.shutdown();
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("Helpdesk server shut down gracefully");
    Ok(())
}

/// Store handles behind the service-layer contracts.
struct Stores {
    users: Arc<dyn UserStore>,
    tickets: Arc<dyn TicketStore>,
    messages: Arc<dyn MessageStore>,
    notifications: Arc<dyn NotificationStore>,
    announcements: Arc<dyn AnnouncementStore>,
}

impl Stores {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(helpdesk_database::memory::MemoryUserStore::new()),
            tickets: Arc::new(helpdesk_database::memory::MemoryTicketStore::new()),
            messages: Arc::new(helpdesk_database::memory::MemoryMessageStore::new()),
            notifications: Arc::new(helpdesk_database::memory::MemoryNotificationStore::new()),
            announcements: Arc::new(helpdesk_database::memory::MemoryAnnouncementStore::new()),
        }
    }

    fn postgres(pool: &DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(helpdesk_database::repositories::UserRepository::new(
                pg.clone(),
            )),
            tickets: Arc::new(helpdesk_database::repositories::TicketRepository::new(
                pg.clone(),
            )),
            messages: Arc::new(helpdesk_database::repositories::MessageRepository::new(
                pg.clone(),
            )),
            notifications: Arc::new(
                helpdesk_database::repositories::NotificationRepository::new(pg.clone()),
            ),
            announcements: Arc::new(
                helpdesk_database::repositories::AnnouncementRepository::new(pg),
            ),
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
