//! Pure domain logic for the StoreHub commerce backend.
//!
//! Nothing in this crate performs I/O. The database, HTTP and storage layers
//! ask these modules for decisions and then carry them out.

pub mod error;
pub mod image_pipeline;
pub mod naming;
pub mod order;
pub mod ordering;
pub mod pricing;
pub mod promotion;
pub mod roles;
pub mod search;
pub mod types;
