pub mod collection;
pub mod media_asset;
pub mod module;
pub mod post;
pub mod product_link;
pub mod section;
pub mod slide;
