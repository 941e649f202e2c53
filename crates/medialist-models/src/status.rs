use serde::{Deserialize, Serialize};

/// User-specific consumption state of a catalogue item.
///
/// `None` means "not in the collection" - the remote service has no entry row
/// for the item. The service's single-letter wire codes are handled in the
/// remote client, never here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    /// Finished it
    Completed,
    /// Currently watching/reading/playing
    InProgress,
    /// Want to get to it
    Pending,
    /// Gave up on it
    Abandoned,
    /// Not in the collection
    None,
}

impl Status {
    /// Statuses that correspond to an actual collection entry.
    pub const MARKED: [Status; 4] = [
        Status::Completed,
        Status::InProgress,
        Status::Pending,
        Status::Abandoned,
    ];

    pub fn is_marked(self) -> bool {
        self != Status::None
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::InProgress => "in-progress",
            Status::Pending => "pending",
            Status::Abandoned => "abandoned",
            Status::None => "none",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
