use crate::error::{Result, StopwatchError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BY_ID_DIR: &str = "/dev/input/by-id";
const INPUT_DIR: &str = "/dev/input";

/// Имена, по которым устройство точно не клавиатура
const NON_KEYBOARD_HINTS: &[&str] = &["mouse", "deathadder", "touchpad", "trackpoint", "joystick"];

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатуру: `"auto"` означает автопоиск, иначе путь берётся как есть
    pub fn find_keyboard_device(device_path: &str) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                StopwatchError::device_not_found(format!(
                    "Указанное устройство не найдено: {:?}",
                    path
                ))
            };
        }

        info!("Начинаем автопоиск клавиатурного устройства...");

        let mut candidates = Self::list_entries(Path::new(BY_ID_DIR), |name| name.contains("event"));
        candidates.extend(Self::list_entries(Path::new(INPUT_DIR), |name| {
            name.starts_with("event")
        }));

        // Стабильная сортировка: при равном приоритете by-id остаётся первым
        candidates.sort_by_key(|(_, name)| std::cmp::Reverse(Self::name_priority(name)));

        for (path, name) in candidates {
            if Self::name_priority(&name) == 0 {
                debug!("Пропускаем {} (не клавиатура по имени)", name);
                continue;
            }
            if Self::is_keyboard_device(&path) {
                info!("Найдена клавиатура: {:?}", path);
                return Ok(path);
            }
        }

        StopwatchError::device_not_found(format!(
            "Не удалось найти подходящее клавиатурное устройство. {}",
            super::permissions::setup_hint()
        ))
    }

    fn list_entries(dir: &Path, filter: impl Fn(&str) -> bool) -> Vec<(PathBuf, String)> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Не удалось прочитать {:?}: {}", dir, e);
                return Vec::new();
            }
        };

        let mut found: Vec<(PathBuf, String)> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                filter(&name).then(|| (entry.path(), name))
            })
            .collect();
        found.sort();
        found
    }

    /// Приоритет устройства по имени файла, 0 значит точно не клавиатура
    fn name_priority(name: &str) -> u8 {
        let lower = name.to_lowercase();
        if NON_KEYBOARD_HINTS.iter().any(|hint| lower.contains(hint)) {
            return 0;
        }
        if lower.ends_with("event-kbd") {
            100
        } else if lower.contains("keyboard") || lower.contains("kbd") {
            50
        } else {
            10
        }
    }

    fn is_keyboard_device(device_path: &Path) -> bool {
        let device = match evdev::Device::open(device_path) {
            Ok(device) => device,
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                return false;
            }
        };

        let device_name = device.name().unwrap_or("Unknown").to_lowercase();
        if NON_KEYBOARD_HINTS.iter().any(|hint| device_name.contains(hint)) {
            debug!("Исключаем устройство {:?} ({})", device_path, device_name);
            return false;
        }

        // Настоящая клавиатура: буквы, пробел, Enter и функциональный ряд
        let is_keyboard = device.supported_keys().is_some_and(|keys| {
            keys.contains(evdev::KeyCode::KEY_A)
                && keys.contains(evdev::KeyCode::KEY_SPACE)
                && keys.contains(evdev::KeyCode::KEY_ENTER)
                && keys.contains(evdev::KeyCode::KEY_F1)
        });

        debug!(
            "Устройство {:?} ({}) {}",
            device_path,
            device_name,
            if is_keyboard { "подходит" } else { "не подходит" }
        );
        is_keyboard
    }
}
