//! Authentication and authorization.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`rbac::MaybeAuth`] -- Optional authentication for public endpoints.
//! - [`ownership`] -- Checks that an admin owns the store a request touches.

pub mod auth;
pub mod ownership;
pub mod rbac;
