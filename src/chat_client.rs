use async_trait::async_trait;

/// Capability seam between the ticker loop and whatever chat platform the
/// bot publishes to. Both operations report success as a bool: the loop
/// only cares whether a push landed, never why it failed (failures are
/// logged by the implementation).
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Apply a display name in every community the bot belongs to. Fallible
    /// per community; the first rejection aborts and reports failure.
    async fn set_display_name(&self, name: &str) -> bool;

    /// Set the bot's global status text.
    async fn set_status(&self, text: &str) -> bool;
}
