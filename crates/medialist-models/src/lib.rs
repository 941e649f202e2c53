pub mod collection;
pub mod content;
pub mod event;
pub mod status;

pub use collection::{CollectionEntry, CollectionItem};
pub use content::{release_year, ContentItem, MediaKind};
pub use event::StatusChangeEvent;
pub use status::Status;
