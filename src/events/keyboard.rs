use crate::mappings::KeyNames;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    Pressed,
    Released,
    Repeat,
}

impl KeyState {
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyState::Released),
            1 => Some(KeyState::Pressed),
            2 => Some(KeyState::Repeat),
            _ => None,
        }
    }
}

/// Модификаторы клавиш
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn with_ctrl(mut self, ctrl: bool) -> Self {
        self.ctrl = ctrl;
        self
    }

    #[allow(dead_code)]
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.super_key
    }

    /// Включить модификатор по имени; `false` если имя не модификатор
    pub fn set_by_name(&mut self, name: &str) -> bool {
        match name {
            "ctrl" | "control" => self.ctrl = true,
            "alt" => self.alt = true,
            "shift" => self.shift = true,
            "super" | "meta" | "win" => self.super_key = true,
            _ => return false,
        }
        true
    }

    pub fn to_vec(&self) -> Vec<&'static str> {
        let mut result = Vec::new();
        if self.ctrl { result.push("ctrl"); }
        if self.alt { result.push("alt"); }
        if self.shift { result.push("shift"); }
        if self.super_key { result.push("super"); }
        result
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.to_vec();
        if modifiers.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", modifiers.join("+"))
        }
    }
}

/// Комбинация клавиш: модификаторы плюс одна основная клавиша
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub code: u16,
}

impl Chord {
    pub fn new(code: u16, modifiers: Modifiers) -> Self {
        Self { modifiers, code }
    }

    /// Разбор строк вида `F1`, `space`, `ctrl+shift+f5`
    pub fn parse(key: &str) -> Result<Self, String> {
        let normalized = key.trim().to_lowercase();
        if normalized.is_empty() {
            return Err("пустое имя клавиши".to_string());
        }

        let mut modifiers = Modifiers::new();
        let mut code = None;

        for part in normalized.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(format!("пустая часть в комбинации '{}'", key));
            }
            if modifiers.set_by_name(part) {
                continue;
            }
            if code.is_some() {
                return Err(format!("больше одной основной клавиши в '{}'", key));
            }
            code = Some(
                KeyNames::translate(part).ok_or_else(|| format!("неизвестная клавиша '{}'", part))?,
            );
        }

        code.map(|code| Self::new(code, modifiers))
            .ok_or_else(|| format!("в '{}' нет основной клавиши", key))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = KeyNames::reverse_translate(self.code).unwrap_or("?");
        if self.modifiers.is_empty() {
            write!(f, "{}", name)
        } else {
            write!(f, "{}+{}", self.modifiers, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::KeyCode;

    #[test]
    fn test_modifiers_creation() {
        let modifiers = Modifiers::new().with_ctrl(true).with_shift(true);

        assert!(modifiers.ctrl);
        assert!(modifiers.shift);
        assert!(!modifiers.alt);
        assert!(!modifiers.super_key);
        assert_eq!(modifiers.to_string(), "ctrl+shift");
    }

    #[test]
    fn test_parse_plain_key() {
        let chord = Chord::parse("F1").unwrap();
        assert_eq!(chord.code, KeyCode::KEY_F1.code());
        assert!(chord.modifiers.is_empty());
        assert_eq!(chord, Chord::parse(" f1 ").unwrap());
    }

    #[test]
    fn test_parse_combination() {
        let chord = Chord::parse("Ctrl+Shift+F5").unwrap();
        assert_eq!(chord.code, KeyCode::KEY_F5.code());
        assert_eq!(chord.modifiers, Modifiers::new().with_ctrl(true).with_shift(true));
        assert_eq!(chord.to_string(), "ctrl+shift+f5");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Chord::parse("").is_err());
        assert!(Chord::parse("ctrl").is_err());
        assert!(Chord::parse("ctrl++a").is_err());
        assert!(Chord::parse("a+b").is_err());
        assert!(Chord::parse("hyper+a").is_err());
    }

    #[test]
    fn test_key_state_from_value() {
        assert_eq!(KeyState::from_value(1), Some(KeyState::Pressed));
        assert_eq!(KeyState::from_value(0), Some(KeyState::Released));
        assert_eq!(KeyState::from_value(2), Some(KeyState::Repeat));
        assert_eq!(KeyState::from_value(7), None);
    }
}
