//! InputHook: граница между реестром горячих клавиш и ОС.
//!
//! Реестр сообщает сюда, какие клавиши надо начать или перестать слушать.
//! Имена клавиш проверяются только здесь; ядро передаёт их как есть.

mod dry_input_hook;
mod evdev_input_hook;
mod r#trait;

pub use self::evdev_input_hook::WatchedChords;
pub use self::r#trait::{create_input_hook, InputHook};
