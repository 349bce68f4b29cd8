use super::clock::Clock;
use super::controller::{SlotKeys, StopwatchController, StopwatchFrame};
use super::StopwatchId;
use crate::config::HotkeyDefaults;
use crate::debug_if_enabled;
use crate::error::{Result, StopwatchError};
use crate::events::{Chord, HotkeyAction, Slot};
use crate::services::HotkeyRegistry;
use std::sync::Arc;
use tracing::{info, warn};

/// Упорядоченный набор секундомеров (порядок добавления = порядок показа).
///
/// Служит таблицей поиска для `HotkeyAction`: реестр хранит только
/// идентификаторы, здесь они превращаются в вызовы таймеров.
/// Всегда содержит хотя бы один секундомер.
pub struct CollectionManager {
    controllers: Vec<StopwatchController>,
    registry: Arc<HotkeyRegistry>,
    clock: Arc<dyn Clock>,
    defaults: HotkeyDefaults,
    next_id: u64,
}

impl CollectionManager {
    /// Создать набор с первым секундомером на клавишах по умолчанию
    pub fn new(
        registry: Arc<HotkeyRegistry>,
        clock: Arc<dyn Clock>,
        defaults: HotkeyDefaults,
    ) -> Result<Self> {
        Self::with_stopwatches(registry, clock, defaults.clone(), vec![(None, defaults)])
    }

    /// Создать набор из готового списка; пустой список заменяется одним секундомером
    pub fn with_stopwatches(
        registry: Arc<HotkeyRegistry>,
        clock: Arc<dyn Clock>,
        defaults: HotkeyDefaults,
        initial: Vec<(Option<String>, HotkeyDefaults)>,
    ) -> Result<Self> {
        let mut manager = Self {
            controllers: Vec::new(),
            registry,
            clock,
            defaults,
            next_id: 1,
        };

        let initial = if initial.is_empty() {
            vec![(None, manager.defaults.clone())]
        } else {
            initial
        };

        for (title, keys) in initial {
            let id = manager.insert(title, SlotKeys::from(&keys))?;
            debug_if_enabled!("Начальный секундомер {} создан", id);
        }

        Ok(manager)
    }

    fn insert(&mut self, title: Option<String>, keys: SlotKeys) -> Result<StopwatchId> {
        let id = StopwatchId(self.next_id);
        let controller = StopwatchController::create(
            id,
            title,
            keys,
            self.registry.clone(),
            self.clock.clone(),
        )?;
        self.next_id += 1;
        self.controllers.push(controller);
        Ok(id)
    }

    /// Добавить секундомер с указанными клавишами.
    /// Совпадающие с другими секундомерами клавиши разрешены: сработают все.
    pub fn add(&mut self, start_key: &str, pause_key: &str, reset_key: &str) -> Result<StopwatchId> {
        let id = self.insert(None, SlotKeys::new(start_key, pause_key, reset_key))?;
        info!("Добавлен секундомер {} (всего {})", id, self.controllers.len());
        Ok(id)
    }

    pub fn add_default(&mut self) -> Result<StopwatchId> {
        let keys = self.defaults.clone();
        self.add(&keys.start_key, &keys.pause_key, &keys.reset_key)
    }

    /// Удалить секундомер; последний оставшийся удалить нельзя
    pub fn remove(&mut self, id: StopwatchId) -> Result<()> {
        let index = self.index_of(id)?;
        if self.controllers.len() <= 1 {
            warn!("Отказано в удалении {}: это последний секундомер", id);
            return Err(StopwatchError::MinimumCollectionSize);
        }

        let mut controller = self.controllers.remove(index);
        controller.remove();
        Ok(())
    }

    /// Выполнить действие горячей клавиши; `false` если секундомера уже нет
    pub fn dispatch(&mut self, action: HotkeyAction) -> bool {
        match self.get_mut(action.target()) {
            Some(controller) => {
                controller.apply(action.slot());
                true
            }
            None => {
                debug_if_enabled!("Действие {} для отсутствующего секундомера", action);
                false
            }
        }
    }

    /// Обработать нажатие клавиши; возвращает число выполненных действий
    pub fn handle_hotkey(&mut self, key: &str) -> usize {
        let registry = self.registry.clone();
        let mut applied = 0;
        registry.fire(key, |action| {
            if self.dispatch(action) {
                applied += 1;
            }
        });
        applied
    }

    /// Имитировать нажатие: срабатывают все клавиши реестра с той же
    /// комбинацией (`f1` найдёт привязку `F1`), как у настоящего слушателя.
    /// Нераспознанное имя ищется в реестре как есть.
    pub fn press(&mut self, key: &str) -> usize {
        let keys = match Chord::parse(key) {
            Ok(chord) => self
                .registry
                .keys_where(|bound| Chord::parse(bound).is_ok_and(|c| c == chord)),
            Err(_) => vec![key.trim().to_string()],
        };
        keys.iter().map(|bound| self.handle_hotkey(bound)).sum()
    }

    pub fn apply(&mut self, id: StopwatchId, slot: Slot) -> Result<()> {
        self.controller_mut(id)?.apply(slot);
        Ok(())
    }

    pub fn rebind(&mut self, id: StopwatchId, slot: Slot, new_key: &str) -> Result<bool> {
        self.controller_mut(id)?.rebind(slot, new_key)
    }

    pub fn rename(&mut self, id: StopwatchId, title: &str) -> Result<()> {
        self.controller_mut(id)?.set_title(title.trim());
        Ok(())
    }

    #[cfg(test)]
    pub fn get(&self, id: StopwatchId) -> Option<&StopwatchController> {
        self.controllers.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: StopwatchId) -> Option<&mut StopwatchController> {
        self.controllers.iter_mut().find(|c| c.id() == id)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &StopwatchController> {
        self.controllers.iter()
    }

    pub fn frames(&self) -> Vec<StopwatchFrame> {
        self.controllers.iter().map(StopwatchController::frame).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    #[cfg(test)]
    pub fn registry(&self) -> &Arc<HotkeyRegistry> {
        &self.registry
    }

    fn index_of(&self, id: StopwatchId) -> Result<usize> {
        self.controllers
            .iter()
            .position(|c| c.id() == id)
            .ok_or(StopwatchError::UnknownStopwatch(id))
    }

    fn controller_mut(&mut self, id: StopwatchId) -> Result<&mut StopwatchController> {
        self.get_mut(id).ok_or(StopwatchError::UnknownStopwatch(id))
    }
}
