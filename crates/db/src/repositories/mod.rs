mod collection_repo;
mod media_asset_repo;
mod module_repo;
mod post_repo;
mod product_link_repo;
mod section_repo;
mod slide_repo;

pub use collection_repo::CollectionRepo;
pub use media_asset_repo::MediaAssetRepo;
pub use module_repo::ModuleRepo;
pub use post_repo::PostRepo;
pub use product_link_repo::ProductLinkRepo;
pub use section_repo::SectionRepo;
pub use slide_repo::SlideRepo;
