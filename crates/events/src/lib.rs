//! StoreHub event bus and order notifications.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StoreEvent`] -- the domain event envelope.
//! - [`delivery`] -- SMTP email delivery.
//! - [`OrderMailer`] -- background subscriber that emails buyers about
//!   their orders.

pub mod bus;
pub mod delivery;
pub mod mailer;

pub use bus::{EventBus, OrderNotice, StoreEvent};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use mailer::OrderMailer;
