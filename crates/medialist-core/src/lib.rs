pub mod bus;
pub mod controller;
pub mod query;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use bus::{BusMessage, EventBus, SubscriptionId, Topic};
pub use controller::{SelectOutcome, StatusControl};
pub use query::{KindFilter, Pager, QueryConfig, QueryResult, SortOption, StatusFilter};
pub use store::CollectionStore;
