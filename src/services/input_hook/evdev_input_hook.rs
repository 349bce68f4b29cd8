use crate::error::Result;
use crate::events::Chord;
use crate::stopwatch_error;
use dashmap::DashMap;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

use super::r#trait::InputHook;

/// Комбинации, которые слушает клавиатура, и строки клавиш реестра для каждой.
/// Разные строки (`F1`, `f1`) могут давать одну комбинацию.
pub type WatchedChords = Arc<DashMap<Chord, SmallVec<[String; 2]>>>;

pub struct EvdevInputHook {
    watched: WatchedChords,
}

impl EvdevInputHook {
    pub fn new(watched: WatchedChords) -> Self {
        info!("Инициализация EvdevInputHook");
        Self { watched }
    }

    fn parse(key: &str) -> Result<Chord> {
        Chord::parse(key).map_err(|e| stopwatch_error!(input_hook, "'{}': {}", key, e))
    }
}

impl InputHook for EvdevInputHook {
    fn bind(&self, key: &str) -> Result<()> {
        let chord = Self::parse(key)?;

        let mut keys = self.watched.entry(chord).or_default();
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }

        info!("Слушаем комбинацию {} для клавиши '{}'", chord, key);
        Ok(())
    }

    fn unbind(&self, key: &str) -> Result<()> {
        let chord = Self::parse(key)?;

        let removed = match self.watched.get_mut(&chord) {
            Some(mut keys) => {
                let before = keys.len();
                keys.retain(|k| k != key);
                before != keys.len()
            }
            None => false,
        };

        if !removed {
            return Err(stopwatch_error!(input_hook, "клавиша '{}' не была привязана", key));
        }

        self.watched.remove_if(&chord, |_, keys| keys.is_empty());
        debug!("Перестали слушать клавишу '{}' ({})", key, chord);
        Ok(())
    }
}
