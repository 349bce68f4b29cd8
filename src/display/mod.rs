//! DisplaySurface: всё, что показывает секундомеры пользователю.
//!
//! Ядро пассивно: поверхность раз в тик получает снимки секундомеров и сама
//! решает, что перерисовать. Команды пользователя приходят строками и
//! разбираются в `commands`.

pub mod commands;
mod terminal;

pub use commands::{spawn_stdin_reader, UiCommand};
pub use terminal::TerminalSurface;

use crate::stopwatch::StopwatchFrame;
use std::io;

pub trait DisplaySurface: Send {
    /// Отрисовать текущее состояние всех секундомеров в порядке показа
    fn render(&mut self, frames: &[StopwatchFrame]) -> io::Result<()>;

    /// Показать сообщение пользователю (ошибки привязки клавиш, справка)
    fn notify(&mut self, message: &str);
}
