pub mod auth;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod sale_service;
pub use sale_service::SaleService;
pub mod wishlist_service;
pub use wishlist_service::WishlistService;
