mod component;
mod page;

pub use component::ComponentResource;
pub use page::PageResource;

pub const COMPONENT: &str = component::TYPE_NAME;
pub const PAGE: &str = page::TYPE_NAME;
