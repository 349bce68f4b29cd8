use evdev::KeyCode;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Имена клавиш, понятные слою горячих клавиш, и их evdev коды.
/// Первое имя для кода считается каноническим.
static KEY_TABLE: &[(&str, KeyCode)] = &[
    // Буквы
    ("a", KeyCode::KEY_A),
    ("b", KeyCode::KEY_B),
    ("c", KeyCode::KEY_C),
    ("d", KeyCode::KEY_D),
    ("e", KeyCode::KEY_E),
    ("f", KeyCode::KEY_F),
    ("g", KeyCode::KEY_G),
    ("h", KeyCode::KEY_H),
    ("i", KeyCode::KEY_I),
    ("j", KeyCode::KEY_J),
    ("k", KeyCode::KEY_K),
    ("l", KeyCode::KEY_L),
    ("m", KeyCode::KEY_M),
    ("n", KeyCode::KEY_N),
    ("o", KeyCode::KEY_O),
    ("p", KeyCode::KEY_P),
    ("q", KeyCode::KEY_Q),
    ("r", KeyCode::KEY_R),
    ("s", KeyCode::KEY_S),
    ("t", KeyCode::KEY_T),
    ("u", KeyCode::KEY_U),
    ("v", KeyCode::KEY_V),
    ("w", KeyCode::KEY_W),
    ("x", KeyCode::KEY_X),
    ("y", KeyCode::KEY_Y),
    ("z", KeyCode::KEY_Z),
    // Верхний ряд цифр
    ("1", KeyCode::KEY_1),
    ("2", KeyCode::KEY_2),
    ("3", KeyCode::KEY_3),
    ("4", KeyCode::KEY_4),
    ("5", KeyCode::KEY_5),
    ("6", KeyCode::KEY_6),
    ("7", KeyCode::KEY_7),
    ("8", KeyCode::KEY_8),
    ("9", KeyCode::KEY_9),
    ("0", KeyCode::KEY_0),
    // Функциональные
    ("f1", KeyCode::KEY_F1),
    ("f2", KeyCode::KEY_F2),
    ("f3", KeyCode::KEY_F3),
    ("f4", KeyCode::KEY_F4),
    ("f5", KeyCode::KEY_F5),
    ("f6", KeyCode::KEY_F6),
    ("f7", KeyCode::KEY_F7),
    ("f8", KeyCode::KEY_F8),
    ("f9", KeyCode::KEY_F9),
    ("f10", KeyCode::KEY_F10),
    ("f11", KeyCode::KEY_F11),
    ("f12", KeyCode::KEY_F12),
    ("f13", KeyCode::KEY_F13),
    ("f14", KeyCode::KEY_F14),
    ("f15", KeyCode::KEY_F15),
    ("f16", KeyCode::KEY_F16),
    ("f17", KeyCode::KEY_F17),
    ("f18", KeyCode::KEY_F18),
    ("f19", KeyCode::KEY_F19),
    ("f20", KeyCode::KEY_F20),
    ("f21", KeyCode::KEY_F21),
    ("f22", KeyCode::KEY_F22),
    ("f23", KeyCode::KEY_F23),
    ("f24", KeyCode::KEY_F24),
    // Специальные
    ("space", KeyCode::KEY_SPACE),
    ("enter", KeyCode::KEY_ENTER),
    ("return", KeyCode::KEY_ENTER),
    ("escape", KeyCode::KEY_ESC),
    ("esc", KeyCode::KEY_ESC),
    ("backspace", KeyCode::KEY_BACKSPACE),
    ("tab", KeyCode::KEY_TAB),
    ("capslock", KeyCode::KEY_CAPSLOCK),
    // Пунктуация
    ("minus", KeyCode::KEY_MINUS),
    ("equal", KeyCode::KEY_EQUAL),
    ("leftbrace", KeyCode::KEY_LEFTBRACE),
    ("rightbrace", KeyCode::KEY_RIGHTBRACE),
    ("backslash", KeyCode::KEY_BACKSLASH),
    ("semicolon", KeyCode::KEY_SEMICOLON),
    ("apostrophe", KeyCode::KEY_APOSTROPHE),
    ("grave", KeyCode::KEY_GRAVE),
    ("comma", KeyCode::KEY_COMMA),
    ("dot", KeyCode::KEY_DOT),
    ("slash", KeyCode::KEY_SLASH),
    // Навигация
    ("insert", KeyCode::KEY_INSERT),
    ("delete", KeyCode::KEY_DELETE),
    ("home", KeyCode::KEY_HOME),
    ("end", KeyCode::KEY_END),
    ("pageup", KeyCode::KEY_PAGEUP),
    ("pagedown", KeyCode::KEY_PAGEDOWN),
    ("up", KeyCode::KEY_UP),
    ("down", KeyCode::KEY_DOWN),
    ("left", KeyCode::KEY_LEFT),
    ("right", KeyCode::KEY_RIGHT),
    // Системные
    ("printscreen", KeyCode::KEY_SYSRQ),
    ("scrolllock", KeyCode::KEY_SCROLLLOCK),
    ("pause", KeyCode::KEY_PAUSE),
    // Numpad
    ("kp0", KeyCode::KEY_KP0),
    ("kp1", KeyCode::KEY_KP1),
    ("kp2", KeyCode::KEY_KP2),
    ("kp3", KeyCode::KEY_KP3),
    ("kp4", KeyCode::KEY_KP4),
    ("kp5", KeyCode::KEY_KP5),
    ("kp6", KeyCode::KEY_KP6),
    ("kp7", KeyCode::KEY_KP7),
    ("kp8", KeyCode::KEY_KP8),
    ("kp9", KeyCode::KEY_KP9),
    ("kpdecimal", KeyCode::KEY_KPDOT),
    ("kpdivide", KeyCode::KEY_KPSLASH),
    ("kpmultiply", KeyCode::KEY_KPASTERISK),
    ("kpadd", KeyCode::KEY_KPPLUS),
    ("kpsubtract", KeyCode::KEY_KPMINUS),
    ("kpenter", KeyCode::KEY_KPENTER),
];

static NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    KEY_TABLE
        .iter()
        .map(|(name, key)| (*name, key.code()))
        .collect()
});

static CODE_TO_NAME: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (name, key) in KEY_TABLE {
        map.entry(key.code()).or_insert(*name);
    }
    map
});

/// Трансляция строковых имён клавиш в evdev коды и обратно
pub struct KeyNames;

impl KeyNames {
    /// Получить evdev код клавиши по её имени (без учёта регистра)
    pub fn translate(key_name: &str) -> Option<u16> {
        let normalized = key_name.trim().to_lowercase();
        NAME_TO_CODE.get(normalized.as_str()).copied()
    }

    /// Каноническое имя клавиши по evdev коду
    pub fn reverse_translate(code: u16) -> Option<&'static str> {
        CODE_TO_NAME.get(&code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_keys() {
        assert_eq!(KeyNames::translate("f1"), Some(KeyCode::KEY_F1.code()));
        assert_eq!(KeyNames::translate("F3"), Some(KeyCode::KEY_F3.code()));
        assert_eq!(KeyNames::translate("f24"), Some(KeyCode::KEY_F24.code()));
        assert_eq!(KeyNames::reverse_translate(KeyCode::KEY_F12.code()), Some("f12"));
    }

    #[test]
    fn test_aliases_share_code_and_canonical_name() {
        assert_eq!(KeyNames::translate("esc"), KeyNames::translate("escape"));
        assert_eq!(KeyNames::reverse_translate(KeyCode::KEY_ESC.code()), Some("escape"));
        assert_eq!(KeyNames::reverse_translate(KeyCode::KEY_ENTER.code()), Some("enter"));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(KeyNames::translate("hyper"), None);
        assert_eq!(KeyNames::translate(""), None);
    }
}
