//! Object storage for uploaded images.
//!
//! - [`ObjectStore`] -- the storage seam used by the API.
//! - [`S3Store`] -- Amazon S3 via `aws-sdk-s3`.
//! - [`MemoryStore`] -- in-process store for tests and local runs without S3.
//! - [`upload`] -- normalise a batch of images to WebP and store them with
//!   bounded parallelism.

pub mod keys;
pub mod memory;
pub mod s3;
pub mod store;
pub mod upload;

pub use memory::MemoryStore;
pub use s3::{S3Config, S3Store};
pub use store::{ObjectStore, StorageError};
pub use upload::{upload_images, UploadFile, UploadReport};
