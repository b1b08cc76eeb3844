//! Promotion discount resolution and effective unit pricing.
//!
//! A product may be attached to several active promotions. The first
//! attachment (in promotion-product id order, as returned by the database)
//! wins; no "best discount" selection is made.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Money};

/// Decimal places kept on computed prices (matches `NUMERIC(12, 2)`).
pub const PRICE_SCALE: u32 = 2;

/// How a promotion's `discount` value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// `discount` is a percentage of the list price.
    Percent,
    /// `discount` is an absolute amount subtracted from the list price.
    Fixed,
}

impl DiscountType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "PERCENT",
            Self::Fixed => "FIXED",
        }
    }

    /// Parse the database / wire representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "PERCENT" => Ok(Self::Percent),
            "FIXED" => Ok(Self::Fixed),
            other => Err(CoreError::Validation(format!(
                "Unknown discount type '{other}'. Must be PERCENT or FIXED"
            ))),
        }
    }
}

/// A discount attached to one product by one promotion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDiscount {
    pub promotion_id: DbId,
    pub discount: Money,
    pub discount_type: DiscountType,
}

/// The price a buyer pays for one unit, plus the discount that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPrice {
    pub list_price: Money,
    pub effective_price: Money,
    pub applied: Option<ProductDiscount>,
}

/// Apply a single discount to a list price.
///
/// The result is not clamped: a FIXED discount larger than the price yields
/// a negative amount.
pub fn effective_price(price: Money, discount: Money, discount_type: DiscountType) -> Money {
    let raw = match discount_type {
        DiscountType::Percent => price * (Decimal::ONE - discount / Decimal::ONE_HUNDRED),
        DiscountType::Fixed => price - discount,
    };
    raw.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Resolve a product's unit price from its active discounts.
///
/// `discounts` must already be restricted to active promotions and ordered
/// the way the storefront lists them; the first entry is applied.
pub fn resolve_price(price: Money, discounts: &[ProductDiscount]) -> ResolvedPrice {
    match discounts.first() {
        Some(first) => ResolvedPrice {
            list_price: price,
            effective_price: effective_price(price, first.discount, first.discount_type),
            applied: Some(first.clone()),
        },
        None => ResolvedPrice {
            list_price: price,
            effective_price: price,
            applied: None,
        },
    }
}

/// Line subtotal for `quantity` units.
pub fn line_subtotal(unit_price: Money, quantity: i32) -> Money {
    unit_price * Decimal::from(quantity)
}

/// Validate a discount value before it is attached to a product.
pub fn validate_discount(discount: Money, discount_type: DiscountType) -> Result<(), CoreError> {
    if discount.is_sign_negative() {
        return Err(CoreError::Validation(
            "Discount must not be negative".into(),
        ));
    }
    if discount_type == DiscountType::Percent && discount > Decimal::ONE_HUNDRED {
        return Err(CoreError::Validation(
            "Percent discount must be between 0 and 100".into(),
        ));
    }
    Ok(())
}
