use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value as JsonValue;

use storehub_events::{EventBus, EventEnvelope, InMemoryEventBus};
use storehub_market::Market;

pub type AppBus = Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>;
pub type AppMarket = Market<AppBus>;

/// Engine wiring shared by all handlers.
pub struct AppServices {
    market: Arc<AppMarket>,
}

impl AppServices {
    pub fn market(&self) -> &AppMarket {
        &self.market
    }
}

/// Build the engine, the notification consumer, and the retention sweep.
pub fn build_services(retention_days: i64) -> AppServices {
    let bus: AppBus = Arc::new(InMemoryEventBus::new());
    let market = Arc::new(Market::new(bus.clone()));

    // Notification collaborator (read-only consumer): turns committed order
    // events into confirmations. Here that means structured log lines; a
    // mailer would subscribe the same way.
    {
        let sub = bus.subscribe();
        tokio::task::spawn_blocking(move || {
            loop {
                match sub.recv() {
                    Ok(envelope) => match envelope.event_type() {
                        "order.placed" => {
                            tracing::info!(
                                order_id = %envelope.subject_id(),
                                "order confirmation queued"
                            );
                        }
                        "order.status_changed" => {
                            tracing::info!(
                                order_id = %envelope.subject_id(),
                                "order status notification queued"
                            );
                        }
                        _ => {}
                    },
                    Err(_) => break,
                }
            }
        });
    }

    // Periodic cleanup collaborator: reclaim session carts past retention.
    {
        let market = market.clone();
        let retention = chrono::Duration::days(retention_days);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(3600));
            loop {
                ticker.tick().await;
                match market.reclaim_session_carts(Utc::now() - retention) {
                    Ok(0) => {}
                    Ok(count) => tracing::info!(count, "session cart retention sweep"),
                    Err(e) => tracing::warn!("session cart retention sweep failed: {e}"),
                }
            }
        });
    }

    AppServices { market }
}
