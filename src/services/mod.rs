pub mod hotkey_registry;
pub mod input_hook;
pub mod keyboard_listener;
pub mod stopwatch_app;

pub use hotkey_registry::HotkeyRegistry;
pub use input_hook::{create_input_hook, WatchedChords};
pub use keyboard_listener::create_keyboard_listener;
pub use stopwatch_app::StopwatchApp;
