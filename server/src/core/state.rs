//! Server state
//!
//! One shared handle to every service. `Clone` is shallow; all services
//! share the same database connection, bus and lock table.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use socketioxide::SocketIo;

use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::db::DbService;
use crate::db::repository::{CartRepository, MenuItemRepository};
use crate::notify::{Notifier, SocketGateway};
use crate::orders::{OrderEngine, TableLocks};
use crate::payments::{HttpCardProvider, PaymentService};
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub notifier: Notifier,
    pub engine: Arc<OrderEngine>,
    pub payments: Arc<PaymentService>,
    pub carts: CartRepository,
    pub menu_items: MenuItemRepository,
}

impl ServerState {
    /// Open the working directory and database, then wire the services
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let work_dir = PathBuf::from(&config.work_dir);
        std::fs::create_dir_all(&work_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create work dir: {e}")))?;

        let db = DbService::new(&work_dir.join("db")).await?;
        Self::with_db(config, db)
    }

    /// Wire the services over an existing database handle. Tests pass an
    /// in-memory one.
    pub fn with_db(config: &Config, db: DbService) -> Result<Self, AppError> {
        let notifier = Notifier::new();
        let locks = TableLocks::new();
        let provider = Arc::new(HttpCardProvider::new(
            config.card_provider_url.clone(),
            config.card_provider_secret.clone(),
        ));
        let engine = Arc::new(OrderEngine::new(&db, notifier.clone(), locks.clone()));
        let payments = Arc::new(PaymentService::new(
            &db,
            notifier.clone(),
            locks,
            provider,
            config.currency.clone(),
        ));

        Ok(Self {
            config: config.clone(),
            carts: CartRepository::new(db.db.clone()),
            menu_items: MenuItemRepository::new(db.db.clone()),
            db,
            notifier,
            engine,
            payments,
        })
    }

    /// Register the long-running background work. The caller owns the
    /// registry and shuts it down after the HTTP server stops.
    pub fn start_background_tasks(&self, io: SocketIo) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let rx = self.notifier.subscribe();
        let token = tasks.shutdown_token();
        tasks.spawn(
            "socket_forwarder",
            TaskKind::Listener,
            SocketGateway::forward(io, rx, token),
        );

        let carts = self.carts.clone();
        let ttl = TimeDelta::minutes(self.config.cart_ttl_minutes);
        let period = Duration::from_secs(self.config.cart_sweep_interval_secs);
        let token = tasks.shutdown_token();
        tasks.spawn("cart_expiry_sweep", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        match carts.delete_expired(ttl).await {
                            Ok(0) => {}
                            Ok(removed) => tracing::info!(removed, "Expired idle carts"),
                            Err(e) => tracing::warn!(error = %e, "Cart expiry sweep failed"),
                        }
                    }
                }
            }
        });

        tasks.log_summary();
        tasks
    }
}
