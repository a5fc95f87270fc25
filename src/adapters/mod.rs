pub mod api;
pub mod prompt;
pub mod store;

pub use api::{ApiClient, ApiConfig, ApiError};
pub use prompt::TerminalConfirm;
pub use store::JsonFileStore;
