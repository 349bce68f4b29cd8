pub mod hotkey;
pub mod keyboard;

pub use hotkey::{HotkeyAction, HotkeyEvent, Slot};
pub use keyboard::{Chord, KeyState, Modifiers};
