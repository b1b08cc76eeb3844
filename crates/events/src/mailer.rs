//! Order notification mailer.
//!
//! [`OrderMailer`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! emails the buyer when one of their orders is placed or changes status.
//! Delivery failures are logged and never reach the request that published
//! the event.

use storehub_core::order::OrderStatus;
use storehub_db::repositories::UserRepo;
use storehub_db::DbPool;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bus::{OrderNotice, StoreEvent, ORDER_PLACED, ORDER_STATUS_CHANGED};
use crate::delivery::email::EmailDelivery;

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEmail {
    pub subject: String,
    pub body: String,
}

/// Render the email for an order event, or `None` for events that do not
/// notify the buyer.
pub fn render(event_type: &str, notice: &OrderNotice) -> Option<OrderEmail> {
    match event_type {
        ORDER_PLACED => Some(OrderEmail {
            subject: format!("Order #{} received", notice.order_id),
            body: format!(
                "Thank you for your order.\n\n\
                 Order: #{}\n\
                 Total: {}\n\
                 Tracking code: {}\n",
                notice.order_id, notice.total_amount, notice.tracking_code
            ),
        }),
        ORDER_STATUS_CHANGED => {
            if notice.previous_status == Some(notice.status) {
                return None;
            }
            Some(OrderEmail {
                subject: format!("Order #{} is now {}", notice.order_id, status_label(notice.status)),
                body: format!(
                    "The status of your order #{} changed to {}.\n\n\
                     Tracking code: {}\n",
                    notice.order_id,
                    status_label(notice.status),
                    notice.tracking_code
                ),
            })
        }
        _ => None,
    }
}

fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Ordered => "ordered",
        OrderStatus::Confirmed => "confirmed",
        OrderStatus::Sent => "on its way",
        OrderStatus::Completed => "completed",
        OrderStatus::Canceled => "canceled",
    }
}

/// Background service that emails buyers about their orders.
pub struct OrderMailer {
    pool: DbPool,
    delivery: EmailDelivery,
}

impl OrderMailer {
    pub fn new(pool: DbPool, delivery: EmailDelivery) -> Self {
        Self { pool, delivery }
    }

    /// Run the mailer loop until `cancel` fires or the bus is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<StoreEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Order mailer cancelled");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => self.handle(&event).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Order mailer lagged, some emails were not sent");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, order mailer shutting down");
                        break;
                    }
                },
            }
        }
    }

    async fn handle(&self, event: &StoreEvent) {
        let Some(notice) = event.order_notice() else {
            return;
        };
        let Some(email) = render(&event.event_type, &notice) else {
            return;
        };

        let recipient = match UserRepo::find_by_id(&self.pool, notice.buyer_id).await {
            Ok(Some(user)) => user.email,
            Ok(None) => {
                tracing::warn!(user_id = notice.buyer_id, order_id = notice.order_id, "Order buyer not found");
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, order_id = notice.order_id, "Failed to load order buyer");
                return;
            }
        };

        if let Err(e) = self.delivery.send(&recipient, &email.subject, email.body).await {
            tracing::error!(
                error = %e,
                order_id = notice.order_id,
                event_type = %event.event_type,
                "Failed to send order email"
            );
        }
    }
}
