//! Order status, payment enums and stock bookkeeping rules.
//!
//! There is no transition table: any status may be set from any
//! other. The only rule with side effects is that entering `Canceled` from a
//! non-canceled status returns the ordered quantities to stock. Leaving
//! `Canceled` does not take them out again.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum number of line items accepted in one order.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity for a single line item.
pub const MAX_LINE_QUANTITY: i32 = 1000;

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// The database / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }

            /// Parse the database / wire representation.
            pub fn parse(s: &str) -> Result<Self, CoreError> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {} '{other}'",
                        $label
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_text_enum! {
    /// Fulfilment status of an order.
    OrderStatus, "order status" {
        Ordered = "ORDERED",
        Confirmed = "CONFIRMED",
        Sent = "SENT",
        Completed = "COMPLETED",
        Canceled = "CANCELED",
    }
}

define_text_enum! {
    /// How the buyer pays.
    PaymentMethod, "payment method" {
        Cod = "COD",
        BankTransfer = "BANK_TRANSFER",
        Card = "CARD",
    }
}

define_text_enum! {
    /// Settlement state of an order's payment.
    PaymentStatus, "payment status" {
        Pending = "PENDING",
        Paid = "PAID",
        Failed = "FAILED",
        Refunded = "REFUNDED",
    }
}

/// Whether changing an order from `previous` to `next` returns its items to stock.
pub fn restores_stock(previous: OrderStatus, next: OrderStatus) -> bool {
    next == OrderStatus::Canceled && previous != OrderStatus::Canceled
}

/// Generate a public tracking code for a new order.
pub fn new_tracking_code() -> uuid::Uuid {
    uuid::Uuid::new_v4()
}

/// Validate the number of line items in an order.
pub fn validate_item_count(count: usize) -> Result<(), CoreError> {
    if count == 0 {
        return Err(CoreError::Validation(
            "Order must contain at least one item".into(),
        ));
    }
    if count > MAX_ORDER_ITEMS {
        return Err(CoreError::Validation(format!(
            "Order cannot contain more than {MAX_ORDER_ITEMS} items"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrderStatus; 5] = [
        OrderStatus::Ordered,
        OrderStatus::Confirmed,
        OrderStatus::Sent,
        OrderStatus::Completed,
        OrderStatus::Canceled,
    ];

    #[test]
    fn cancel_from_active_status_restores_stock() {
        for prev in ALL.iter().filter(|s| **s != OrderStatus::Canceled) {
            assert!(restores_stock(*prev, OrderStatus::Canceled), "{prev}");
        }
    }

    #[test]
    fn cancel_twice_restores_once() {
        assert!(!restores_stock(OrderStatus::Canceled, OrderStatus::Canceled));
    }

    #[test]
    fn uncancel_does_not_touch_stock() {
        // Known gap: reactivating a canceled order does not take stock again.
        for next in ALL {
            if next != OrderStatus::Canceled {
                assert!(!restores_stock(OrderStatus::Canceled, next));
            }
        }
    }

    #[test]
    fn status_parse_and_display() {
        for status in ALL {
            assert_eq!(OrderStatus::parse(&status.to_string()).unwrap(), status);
        }
        assert!(OrderStatus::parse("LOST").is_err());
    }

    #[test]
    fn payment_enums_use_screaming_case() {
        assert_eq!(PaymentMethod::BankTransfer.as_str(), "BANK_TRANSFER");
        assert_eq!(PaymentStatus::parse("REFUNDED").unwrap(), PaymentStatus::Refunded);
    }

    #[test]
    fn tracking_codes_are_unique_uuids() {
        let a = new_tracking_code();
        let b = new_tracking_code();
        assert_eq!(a.get_version_num(), 4);
        assert_ne!(a, b);
    }

    #[test]
    fn item_count_bounds() {
        assert!(validate_item_count(0).is_err());
        assert!(validate_item_count(1).is_ok());
        assert!(validate_item_count(MAX_ORDER_ITEMS + 1).is_err());
    }
}
