use crate::error::Result;
use std::sync::Arc;

use super::dry_input_hook::DryRunInputHook;
use super::evdev_input_hook::{EvdevInputHook, WatchedChords};

/// Trait for the OS-level layer that actually listens for hotkeys
pub trait InputHook: Send + Sync {
    /// Start forwarding presses of `key`; fails for keys the platform can't bind
    fn bind(&self, key: &str) -> Result<()>;

    /// Stop forwarding presses of `key`
    fn unbind(&self, key: &str) -> Result<()>;
}

/// Factory function to create an appropriate input hook based on the dry_run flag
pub fn create_input_hook(watched: WatchedChords, dry_run: bool) -> Arc<dyn InputHook> {
    if dry_run {
        Arc::new(DryRunInputHook::new())
    } else {
        Arc::new(EvdevInputHook::new(watched))
    }
}
