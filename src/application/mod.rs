pub mod channels;
pub mod fetch;
pub mod inventory;
pub mod retire;

pub use channels::{ChannelError, ChannelService};
pub use fetch::{FetchError, FetchService};
pub use inventory::InventoryService;
pub use retire::{RetireError, RetireOutcome, RetireService};
