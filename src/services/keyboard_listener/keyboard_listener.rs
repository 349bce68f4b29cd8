use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::{Result, StopwatchError};
use crate::events::{Chord, HotkeyEvent, KeyState};
use crate::services::input_hook::WatchedChords;
use crate::utils::DeviceFinder;
use evdev::{Device, EventType, InputEvent};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use super::modifier_state::ModifierState;
use super::r#trait::KeyboardListenerTrait;

/// Читает клавиатуру через evdev и превращает нажатия отслеживаемых
/// комбинаций в `HotkeyEvent`. Устройство не захватывается эксклюзивно:
/// клавиши продолжают доходить до остальных приложений.
pub struct RealKeyboardListener {
    device: Device,
    watched: WatchedChords,
    events: UnboundedSender<HotkeyEvent>,
}

impl RealKeyboardListener {
    pub fn new(
        config: Arc<Config>,
        watched: WatchedChords,
        events: UnboundedSender<HotkeyEvent>,
    ) -> Result<Self> {
        info!("Инициализация RealKeyboardListener");

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;

        let device = Device::open(&device_path).map_err(|e| {
            StopwatchError::DeviceNotFound(format!(
                "Не удалось открыть устройство {:?}: {}",
                device_path, e
            ))
        })?;

        info!("Устройство: {}", device.name().unwrap_or("Unknown"));
        info!("Физический путь: {:?}", device.physical_path());

        Ok(Self {
            device,
            watched,
            events,
        })
    }

    async fn run_impl(self) -> Result<()> {
        let Self {
            device,
            watched,
            events,
        } = self;

        let mut stream = device.into_event_stream()?;
        let mut modifier_state = ModifierState::new();

        info!("RealKeyboardListener запущен, начинаем чтение событий");

        loop {
            let event = match stream.next_event().await {
                Ok(event) => event,
                Err(e) if Self::is_device_gone(&e) => {
                    return Err(StopwatchError::DeviceNotFound(format!(
                        "Клавиатура отключена: {}",
                        e
                    )));
                }
                Err(e) => {
                    error!("Ошибка чтения событий: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            for key in Self::matching_keys(&watched, &mut modifier_state, event) {
                debug_if_enabled!("Горячая клавиша '{}' нажата", key);
                if events.send(HotkeyEvent::new(key)).is_err() {
                    info!("Получатель горячих клавиш закрыт, слушатель останавливается");
                    return Ok(());
                }
            }
        }
    }

    /// Устройство пропало (выдернули клавиатуру): повторять чтение бессмысленно
    fn is_device_gone(error: &std::io::Error) -> bool {
        error.raw_os_error() == Some(libc::ENODEV)
    }

    /// Строки клавиш реестра, которые надо сработать для данного события
    fn matching_keys(
        watched: &WatchedChords,
        modifier_state: &mut ModifierState,
        event: InputEvent,
    ) -> Vec<String> {
        if event.event_type() != EventType::KEY {
            return Vec::new();
        }

        let Some(state) = KeyState::from_value(event.value()) else {
            debug_if_enabled!("Неизвестное значение события: {}", event.value());
            return Vec::new();
        };

        let code = event.code();
        let is_modifier = modifier_state.update_key(code, state != KeyState::Released);

        // Автоповтор и отпускание не считаются новым нажатием
        if is_modifier || state != KeyState::Pressed {
            return Vec::new();
        }

        let chord = Chord::new(code, modifier_state.to_modifiers());
        watched
            .get(&chord)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for RealKeyboardListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::KeyCode;

    fn key_event(key: KeyCode, value: i32) -> InputEvent {
        InputEvent::new(EventType::KEY.0, key.code(), value)
    }

    fn watched(keys: &[&str]) -> WatchedChords {
        let watched = WatchedChords::default();
        for key in keys {
            watched
                .entry(Chord::parse(key).unwrap())
                .or_default()
                .push(key.to_string());
        }
        watched
    }

    #[test]
    fn test_unplugged_device_is_fatal() {
        let gone = std::io::Error::from_raw_os_error(libc::ENODEV);
        assert!(RealKeyboardListener::is_device_gone(&gone));

        let transient = std::io::Error::from_raw_os_error(libc::EAGAIN);
        assert!(!RealKeyboardListener::is_device_gone(&transient));
    }

    #[test]
    fn test_press_of_watched_key() {
        let watched = watched(&["F1", "f1"]);
        let mut state = ModifierState::new();

        let keys = RealKeyboardListener::matching_keys(&watched, &mut state, key_event(KeyCode::KEY_F1, 1));
        assert_eq!(keys, vec!["F1".to_string(), "f1".to_string()]);
    }

    #[test]
    fn test_release_and_repeat_are_ignored() {
        let watched = watched(&["F1"]);
        let mut state = ModifierState::new();

        assert!(RealKeyboardListener::matching_keys(&watched, &mut state, key_event(KeyCode::KEY_F1, 2)).is_empty());
        assert!(RealKeyboardListener::matching_keys(&watched, &mut state, key_event(KeyCode::KEY_F1, 0)).is_empty());
    }

    #[test]
    fn test_modifiers_must_match_exactly() {
        let watched = watched(&["ctrl+f5"]);
        let mut state = ModifierState::new();

        assert!(RealKeyboardListener::matching_keys(&watched, &mut state, key_event(KeyCode::KEY_F5, 1)).is_empty());

        RealKeyboardListener::matching_keys(&watched, &mut state, key_event(KeyCode::KEY_LEFTCTRL, 1));
        let keys = RealKeyboardListener::matching_keys(&watched, &mut state, key_event(KeyCode::KEY_F5, 1));
        assert_eq!(keys, vec!["ctrl+f5".to_string()]);

        RealKeyboardListener::matching_keys(&watched, &mut state, key_event(KeyCode::KEY_LEFTCTRL, 0));
        assert!(RealKeyboardListener::matching_keys(&watched, &mut state, key_event(KeyCode::KEY_F5, 1)).is_empty());
    }
}
