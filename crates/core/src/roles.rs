//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users_and_stores.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CUSTOMER: &str = "customer";

/// Whether `role` is one of the known role names.
pub fn is_known_role(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_CUSTOMER
}
