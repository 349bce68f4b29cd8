use crate::config::Config;
use crate::error::Result;
use crate::events::HotkeyEvent;
use crate::services::input_hook::WatchedChords;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Trait for keyboard listeners that can run in different modes
#[async_trait::async_trait]
pub trait KeyboardListenerTrait {
    /// Run the keyboard listener until the hotkey receiver goes away
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate keyboard listener based on the dry_run flag
pub fn create_keyboard_listener(
    config: Arc<Config>,
    watched: WatchedChords,
    events: UnboundedSender<HotkeyEvent>,
    dry_run: bool,
) -> Result<Box<dyn KeyboardListenerTrait + Send>> {
    if dry_run {
        Ok(Box::new(super::dry_keyboard_listener::DryRunKeyboardListener::new(
            watched, events,
        )?))
    } else {
        Ok(Box::new(super::keyboard_listener::RealKeyboardListener::new(
            config, watched, events,
        )?))
    }
}
