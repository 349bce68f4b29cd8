use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::HotkeyAction;
use crate::services::input_hook::InputHook;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

type ActionList = SmallVec<[HotkeyAction; 2]>;

/// Общий для процесса реестр: клавиша -> действия в порядке регистрации.
///
/// Ключ присутствует только с непустым списком действий. Пока ключ есть в
/// реестре, он привязан в `InputHook`; последний `unregister` отвязывает его.
pub struct HotkeyRegistry {
    bindings: Mutex<HashMap<String, ActionList>>,
    hook: Arc<dyn InputHook>,
}

impl HotkeyRegistry {
    pub fn new(hook: Arc<dyn InputHook>) -> Self {
        info!("Инициализация HotkeyRegistry");
        Self {
            bindings: Mutex::new(HashMap::new()),
            hook,
        }
    }

    /// Добавить действие для клавиши; `Ok(false)` если пара уже есть
    pub fn register(&self, key: &str, action: HotkeyAction) -> Result<bool> {
        let mut bindings = self.bindings.lock();

        if let Some(actions) = bindings.get_mut(key) {
            if actions.contains(&action) {
                debug_if_enabled!("Пара '{}' -> {} уже зарегистрирована", key, action);
                return Ok(false);
            }
            actions.push(action);
            debug_if_enabled!("Клавиша '{}': добавлено {} (всего {})", key, action, actions.len());
            return Ok(true);
        }

        // Новая клавиша: сначала привязка в ОС, потом запись в реестр
        self.hook.bind(key)?;
        let mut actions = ActionList::new();
        actions.push(action);
        bindings.insert(key.to_string(), actions);
        info!("Зарегистрирована горячая клавиша '{}' -> {}", key, action);
        Ok(true)
    }

    /// Убрать действие; `false` если такой пары не было
    pub fn unregister(&self, key: &str, action: HotkeyAction) -> bool {
        let mut bindings = self.bindings.lock();

        let Some(actions) = bindings.get_mut(key) else {
            return false;
        };
        let Some(position) = actions.iter().position(|a| *a == action) else {
            return false;
        };
        actions.remove(position);

        if actions.is_empty() {
            bindings.remove(key);
            if let Err(e) = self.hook.unbind(key) {
                warn!("Не удалось отвязать клавишу '{}': {}", key, e);
            }
            info!("Горячая клавиша '{}' больше не используется", key);
        } else {
            debug_if_enabled!("Клавиша '{}': убрано {}", key, action);
        }

        true
    }

    /// Вызвать `handler` для каждого действия клавиши в порядке регистрации.
    ///
    /// Список копируется под блокировкой, сами вызовы идут без неё, так что
    /// обработчик может менять реестр. Возвращает число вызванных действий.
    pub fn fire<F>(&self, key: &str, mut handler: F) -> usize
    where
        F: FnMut(HotkeyAction),
    {
        let snapshot = self.actions(key);
        debug_if_enabled!("Срабатывание '{}': {} действий", key, snapshot.len());

        for action in &snapshot {
            handler(*action);
        }
        snapshot.len()
    }

    pub fn actions(&self, key: &str) -> Vec<HotkeyAction> {
        self.bindings
            .lock()
            .get(key)
            .map(|actions| actions.to_vec())
            .unwrap_or_default()
    }

    /// Зарегистрированные клавиши, подходящие под условие, в алфавитном порядке
    pub fn keys_where<P>(&self, predicate: P) -> Vec<String>
    where
        P: Fn(&str) -> bool,
    {
        let mut keys: Vec<String> = self
            .bindings
            .lock()
            .keys()
            .filter(|key| predicate(key))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    #[cfg(test)]
    pub fn contains_key(&self, key: &str) -> bool {
        self.bindings.lock().contains_key(key)
    }

    #[cfg(test)]
    pub fn keys(&self) -> Vec<String> {
        self.keys_where(|_| true)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.bindings.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.bindings.lock().is_empty()
    }
}
