use crate::display::commands::HELP;
use crate::display::{DisplaySurface, UiCommand};
use crate::error::{Result, StopwatchError};
use crate::events::HotkeyEvent;
use crate::stopwatch::CollectionManager;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Единственный потребитель: владеет секундомерами, принимает горячие клавиши
/// и команды пользователя и раз в тик отдаёт снимки на поверхность.
/// Таймеры читаются и меняются только из этого цикла.
pub struct StopwatchApp<S: DisplaySurface> {
    manager: CollectionManager,
    surface: S,
    tick: Duration,
}

impl<S: DisplaySurface> StopwatchApp<S> {
    pub fn new(manager: CollectionManager, surface: S, tick: Duration) -> Self {
        info!("Инициализация StopwatchApp (тик {}мс)", tick.as_millis());
        Self {
            manager,
            surface,
            tick,
        }
    }

    #[cfg(test)]
    pub fn manager(&self) -> &CollectionManager {
        &self.manager
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn handle_hotkey(&mut self, event: &HotkeyEvent) {
        let applied = self.manager.handle_hotkey(&event.key);
        debug!("Горячая клавиша {}: выполнено {} действий", event, applied);
    }

    /// Разобрать и выполнить строку пользователя; `false` означает выход
    pub fn handle_line(&mut self, line: &str) -> bool {
        match UiCommand::parse(line) {
            Ok(Some(command)) => self.handle_command(command),
            Ok(None) => true,
            Err(message) => {
                self.surface.notify(&message);
                true
            }
        }
    }

    pub fn handle_command(&mut self, command: UiCommand) -> bool {
        debug!("Команда пользователя: {:?}", command);

        let result = match command {
            UiCommand::Quit => return false,
            UiCommand::Help => {
                self.surface.notify(HELP);
                Ok(())
            }
            UiCommand::Add => self.manager.add_default().map(|_| ()),
            UiCommand::Remove(id) => self.manager.remove(id),
            UiCommand::Control(id, slot) => self.manager.apply(id, slot),
            UiCommand::Rebind { id, slot, key } => self.manager.rebind(id, slot, &key).map(|_| ()),
            UiCommand::Rename { id, title } => self.manager.rename(id, &title),
            UiCommand::Press(key) => {
                let applied = self.manager.press(&key);
                if applied == 0 {
                    self.surface
                        .notify(&format!("Клавиша '{}' ни к чему не привязана", key));
                }
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(e);
        }
        true
    }

    fn report(&mut self, error: StopwatchError) {
        if error.is_recoverable() {
            warn!("{}", error);
        } else {
            warn!("Неожиданная ошибка команды: {}", error);
        }
        self.surface.notify(&error.to_string());
    }

    pub fn render(&mut self) {
        let frames = self.manager.frames();
        if let Err(e) = self.surface.render(&frames) {
            warn!("Ошибка отрисовки: {}", e);
        }
    }

    /// Главный цикл до сигнала `shutdown`, команды `quit` или закрытия обоих каналов
    pub async fn run<F>(
        &mut self,
        mut hotkeys: UnboundedReceiver<HotkeyEvent>,
        mut lines: UnboundedReceiver<String>,
        shutdown: F,
    ) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut hotkeys_open = true;
        let mut lines_open = true;

        info!("StopwatchApp запущен");
        self.render();

        loop {
            tokio::select! {
                biased;

                line = lines.recv(), if lines_open => match line {
                    Some(line) => {
                        if !self.handle_line(&line) {
                            info!("Получена команда выхода");
                            break;
                        }
                    }
                    None => {
                        debug!("Канал команд закрыт");
                        lines_open = false;
                    }
                },
                event = hotkeys.recv(), if hotkeys_open => match event {
                    Some(event) => self.handle_hotkey(&event),
                    None => {
                        debug!("Канал горячих клавиш закрыт");
                        hotkeys_open = false;
                    }
                },
                _ = ticker.tick() => self.render(),
                _ = &mut shutdown => {
                    info!("Получен сигнал завершения");
                    break;
                }
            }

            if !hotkeys_open && !lines_open {
                info!("Источники событий закрыты, завершаем работу");
                break;
            }
        }

        self.render();
        Ok(())
    }
}
