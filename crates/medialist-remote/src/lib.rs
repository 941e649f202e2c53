pub mod client;
pub mod error;
pub mod traits;
pub mod wire;

pub use client::CatalogClient;
pub use error::RemoteError;
pub use traits::{ContentService, ItemLookup};
