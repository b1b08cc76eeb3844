//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-statement writes open
//! their own transaction.

pub mod banner_repo;
pub mod brand_repo;
pub mod cart_repo;
pub mod category_repo;
pub mod order_repo;
pub mod position;
pub mod product_repo;
pub mod promotion_repo;
pub mod store_repo;
pub mod user_repo;

pub use banner_repo::BannerRepo;
pub use brand_repo::BrandRepo;
pub use cart_repo::CartRepo;
pub use category_repo::{CategoryDeletion, CategoryRepo, CategoryUpdate};
pub use order_repo::{OrderError, OrderRepo, OrderUpdate};
pub use product_repo::ProductRepo;
pub use promotion_repo::PromotionRepo;
pub use store_repo::StoreRepo;
pub use user_repo::UserRepo;
