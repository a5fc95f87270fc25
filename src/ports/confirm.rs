use super::PortError;

/// Port for yes/no questions put to the operator
///
/// Synchronous: implementations may block on the terminal while the operator answers.
pub trait Confirm: Send + Sync {
    /// Ask `prompt`; an empty answer selects `default`
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, PortError>;
}
