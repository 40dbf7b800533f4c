pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod wishlist_repo;
pub use wishlist_repo::WishlistRepository;

pub mod store;
pub mod pg_store;
pub use pg_store::PgStore;

#[cfg(test)]
pub mod memory_store;
