//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to the corresponding repository in `storehub_db` and
//! map errors via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod banner;
pub mod brand;
pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod promotion;
pub mod store;
pub mod upload;
