use super::clock::Clock;
use super::timer::{format_elapsed, Timer, TimerState};
use super::StopwatchId;
use crate::config::HotkeyDefaults;
use crate::error::Result;
use crate::events::{HotkeyAction, Slot};
use crate::services::HotkeyRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_TITLE: &str = "Stopwatch";

/// Клавиши трёх слотов одного секундомера
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotKeys {
    pub start: String,
    pub pause: String,
    pub reset: String,
}

impl SlotKeys {
    pub fn new(start: impl Into<String>, pause: impl Into<String>, reset: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            pause: pause.into(),
            reset: reset.into(),
        }
    }

    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Start => &self.start,
            Slot::Pause => &self.pause,
            Slot::Reset => &self.reset,
        }
    }

    fn get_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::Start => &mut self.start,
            Slot::Pause => &mut self.pause,
            Slot::Reset => &mut self.reset,
        }
    }
}

impl From<&HotkeyDefaults> for SlotKeys {
    fn from(defaults: &HotkeyDefaults) -> Self {
        Self::new(
            defaults.start_key.clone(),
            defaults.pause_key.clone(),
            defaults.reset_key.clone(),
        )
    }
}

/// Снимок секундомера для отрисовки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwatchFrame {
    pub id: StopwatchId,
    pub title: String,
    pub state: TimerState,
    pub elapsed: Duration,
    pub keys: SlotKeys,
}

impl StopwatchFrame {
    pub fn elapsed_text(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

/// Секундомер вместе с его тремя горячими клавишами.
///
/// Регистрирует и снимает свои пары (клавиша, действие) только через
/// `HotkeyRegistry`; сами записи реестра ему не принадлежат.
pub struct StopwatchController {
    id: StopwatchId,
    title: String,
    timer: Timer,
    keys: SlotKeys,
    registry: Arc<HotkeyRegistry>,
    removed: bool,
}

impl StopwatchController {
    pub fn create(
        id: StopwatchId,
        title: Option<String>,
        keys: SlotKeys,
        registry: Arc<HotkeyRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        for (index, slot) in Slot::ALL.into_iter().enumerate() {
            if let Err(e) = registry.register(keys.get(slot), HotkeyAction::new(slot, id)) {
                // Откатываем уже зарегистрированные слоты
                for done in &Slot::ALL[..index] {
                    registry.unregister(keys.get(*done), HotkeyAction::new(*done, id));
                }
                return Err(e);
            }
        }

        info!(
            "Создан секундомер {} (start: '{}', pause: '{}', reset: '{}')",
            id, keys.start, keys.pause, keys.reset
        );

        Ok(Self {
            id,
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            timer: Timer::new(clock),
            keys,
            registry,
            removed: false,
        })
    }

    pub fn id(&self) -> StopwatchId {
        self.id
    }

    #[cfg(test)]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[cfg(test)]
    pub fn keys(&self) -> &SlotKeys {
        &self.keys
    }

    #[cfg(test)]
    pub fn key(&self, slot: Slot) -> &str {
        self.keys.get(slot)
    }

    #[cfg(test)]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    #[cfg(test)]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn start(&mut self) {
        if !self.removed {
            self.timer.start();
        }
    }

    pub fn pause(&mut self) {
        if !self.removed {
            self.timer.pause();
        }
    }

    pub fn reset(&mut self) {
        if !self.removed {
            self.timer.reset();
        }
    }

    pub fn apply(&mut self, slot: Slot) {
        match slot {
            Slot::Start => self.start(),
            Slot::Pause => self.pause(),
            Slot::Reset => self.reset(),
        }
    }

    /// Переназначить клавишу слота.
    ///
    /// Пустая строка (отменённый ввод) и текущая клавиша слота ничего не
    /// меняют: `Ok(false)`. Новая клавиша регистрируется раньше, чем
    /// снимается старая, так что при ошибке реестр остаётся прежним,
    /// включая порядок срабатывания на старой клавише.
    pub fn rebind(&mut self, slot: Slot, new_key: &str) -> Result<bool> {
        let new_key = new_key.trim();
        if self.removed || new_key.is_empty() || new_key == self.keys.get(slot) {
            return Ok(false);
        }

        let action = HotkeyAction::new(slot, self.id);
        if let Err(e) = self.registry.register(new_key, action) {
            warn!("Секундомер {}: клавиша '{}' отклонена: {}", self.id, new_key, e);
            return Err(e);
        }

        let old_key = std::mem::replace(self.keys.get_mut(slot), new_key.to_string());
        self.registry.unregister(&old_key, action);

        info!(
            "Секундомер {}: {} переназначен '{}' -> '{}'",
            self.id, slot, old_key, new_key
        );
        Ok(true)
    }

    /// Снять все привязки; повторный вызов ничего не делает и возвращает `false`
    pub fn remove(&mut self) -> bool {
        if self.removed {
            return false;
        }

        for slot in Slot::ALL {
            self.registry
                .unregister(self.keys.get(slot), HotkeyAction::new(slot, self.id));
        }
        self.removed = true;

        info!("Секундомер {} удалён", self.id);
        true
    }

    pub fn frame(&self) -> StopwatchFrame {
        StopwatchFrame {
            id: self.id,
            title: self.title.clone(),
            state: self.timer.state(),
            elapsed: self.timer.elapsed(),
            keys: self.keys.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::hotkey_registry::tests::RecordingHook;
    use crate::stopwatch::clock::ManualClock;

    struct Fixture {
        clock: Arc<ManualClock>,
        hook: Arc<RecordingHook>,
        registry: Arc<HotkeyRegistry>,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_hook(RecordingHook::default())
        }

        fn with_hook(hook: RecordingHook) -> Self {
            let hook = Arc::new(hook);
            Self {
                clock: Arc::new(ManualClock::new()),
                registry: Arc::new(HotkeyRegistry::new(hook.clone())),
                hook,
            }
        }

        fn controller(&self, id: u64, keys: SlotKeys) -> Result<StopwatchController> {
            StopwatchController::create(
                StopwatchId(id),
                None,
                keys,
                self.registry.clone(),
                self.clock.clone(),
            )
        }

        fn fire(&self, controller: &mut StopwatchController, key: &str) -> usize {
            self.registry.fire(key, |action| {
                assert_eq!(action.target(), controller.id());
                controller.apply(action.slot());
            })
        }
    }

    #[test]
    fn test_create_registers_three_keys() {
        let fx = Fixture::new();
        let controller = fx.controller(1, SlotKeys::new("F1", "F2", "F3")).unwrap();

        assert_eq!(controller.title(), DEFAULT_TITLE);
        assert_eq!(controller.timer().state(), TimerState::Reset);
        assert_eq!(fx.registry.actions("F1"), vec![HotkeyAction::Start(StopwatchId(1))]);
        assert_eq!(fx.registry.actions("F2"), vec![HotkeyAction::Pause(StopwatchId(1))]);
        assert_eq!(fx.registry.actions("F3"), vec![HotkeyAction::Reset(StopwatchId(1))]);
    }

    #[test]
    fn test_hotkey_scenario_start_pause_reset() {
        let fx = Fixture::new();
        let mut controller = fx.controller(1, SlotKeys::new("F1", "F2", "F3")).unwrap();

        fx.fire(&mut controller, "F1");
        assert_eq!(controller.timer().state(), TimerState::Running);

        fx.clock.advance_ms(1500);
        fx.fire(&mut controller, "F2");
        assert_eq!(controller.timer().state(), TimerState::Paused);
        assert_eq!(controller.timer().elapsed(), Duration::from_millis(1500));

        fx.fire(&mut controller, "F3");
        assert_eq!(controller.timer().state(), TimerState::Reset);
        assert_eq!(controller.timer().elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_rebind_start_key() {
        let fx = Fixture::new();
        let mut controller = fx.controller(1, SlotKeys::new("F1", "F2", "F3")).unwrap();

        assert!(controller.rebind(Slot::Start, "F5").unwrap());
        assert_eq!(controller.key(Slot::Start), "F5");
        assert!(!fx.registry.contains_key("F1"));
        assert!(!fx.hook.is_bound("F1"));

        assert_eq!(fx.fire(&mut controller, "F1"), 0);
        assert_eq!(controller.timer().state(), TimerState::Reset);

        assert_eq!(fx.fire(&mut controller, "F5"), 1);
        assert_eq!(controller.timer().state(), TimerState::Running);
    }

    #[test]
    fn test_rebind_with_empty_or_same_key_is_noop() {
        let fx = Fixture::new();
        let mut controller = fx.controller(1, SlotKeys::new("F1", "F2", "F3")).unwrap();

        assert!(!controller.rebind(Slot::Pause, "").unwrap());
        assert!(!controller.rebind(Slot::Pause, "   ").unwrap());
        assert!(!controller.rebind(Slot::Pause, "F2").unwrap());
        assert_eq!(controller.key(Slot::Pause), "F2");
        assert_eq!(fx.registry.actions("F2"), vec![HotkeyAction::Pause(StopwatchId(1))]);
    }

    #[test]
    fn test_rebind_onto_another_slot_key() {
        let fx = Fixture::new();
        let mut controller = fx.controller(1, SlotKeys::new("F1", "F2", "F3")).unwrap();

        // Одна клавиша и для старта, и для паузы: оба действия на F2
        controller.rebind(Slot::Start, "F2").unwrap();
        assert_eq!(
            fx.registry.actions("F2"),
            vec![HotkeyAction::Pause(StopwatchId(1)), HotkeyAction::Start(StopwatchId(1))]
        );
        assert!(!fx.registry.contains_key("F1"));
    }

    #[test]
    fn test_rejected_rebind_keeps_old_binding() {
        let fx = Fixture::with_hook(RecordingHook::rejecting(&["bogus"]));
        let mut controller = fx.controller(1, SlotKeys::new("F1", "F2", "F3")).unwrap();

        let err = controller.rebind(Slot::Reset, "bogus").unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(controller.key(Slot::Reset), "F3");
        assert_eq!(fx.registry.actions("F3"), vec![HotkeyAction::Reset(StopwatchId(1))]);
        assert!(!fx.registry.contains_key("bogus"));
    }

    #[test]
    fn test_create_rolls_back_on_bind_failure() {
        let fx = Fixture::with_hook(RecordingHook::rejecting(&["bogus"]));
        let result = fx.controller(1, SlotKeys::new("F1", "F2", "bogus"));

        assert!(result.is_err());
        assert!(fx.registry.is_empty());
        assert!(fx.hook.bound.lock().is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let fx = Fixture::new();
        let mut controller = fx.controller(1, SlotKeys::new("F1", "F2", "F3")).unwrap();
        controller.start();

        assert!(controller.remove());
        assert!(controller.is_removed());
        assert!(fx.registry.is_empty());

        assert!(!controller.remove());
        assert!(!controller.rebind(Slot::Start, "F6").unwrap());
        assert!(fx.registry.is_empty());
    }

    #[test]
    fn test_removed_controller_ignores_commands() {
        let fx = Fixture::new();
        let mut controller = fx.controller(1, SlotKeys::new("F1", "F2", "F3")).unwrap();
        controller.remove();

        controller.start();
        assert_eq!(controller.timer().state(), TimerState::Reset);
    }

    #[test]
    fn test_frame_snapshot() {
        let fx = Fixture::new();
        let mut controller = fx.controller(4, SlotKeys::new("F1", "F2", "F3")).unwrap();
        controller.set_title("Раунд");
        controller.start();
        fx.clock.advance_ms(61_250);

        let frame = controller.frame();
        assert_eq!(frame.id, StopwatchId(4));
        assert_eq!(frame.title, "Раунд");
        assert_eq!(frame.state, TimerState::Running);
        assert_eq!(frame.elapsed_text(), "00:01:01:250");
        assert_eq!(frame.keys, SlotKeys::new("F1", "F2", "F3"));
    }
}
