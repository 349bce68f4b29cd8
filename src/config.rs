use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub display: DisplayConfig,
    pub hotkeys: HotkeyDefaults,
    #[serde(default)]
    pub stopwatches: Vec<StopwatchConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Период перерисовки в миллисекундах
    pub tick_ms: u64,
}

/// Клавиши, которые получает каждый новый секундомер
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HotkeyDefaults {
    pub start_key: String,
    pub pause_key: String,
    pub reset_key: String,
}

/// Секундомер, создаваемый при запуске
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StopwatchConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_key: Option<String>,
    #[serde(default)]
    pub pause_key: Option<String>,
    #[serde(default)]
    pub reset_key: Option<String>,
}

impl Default for HotkeyDefaults {
    fn default() -> Self {
        Self {
            start_key: "F1".to_string(),
            pause_key: "F2".to_string(),
            reset_key: "F3".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            input: InputConfig {
                device_path: "auto".to_string(),
            },
            display: DisplayConfig { tick_ms: 10 },
            hotkeys: HotkeyDefaults::default(),
            stopwatches: Vec::new(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        // Значения по умолчанию, поверх них файл и переменные окружения
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("STOPWATCHES_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.input.device_path.trim().is_empty() {
            anyhow::bail!("input.device_path не может быть пустым (используйте \"auto\")");
        }

        if self.display.tick_ms == 0 {
            anyhow::bail!("display.tick_ms должно быть больше 0");
        }

        for (name, key) in [
            ("start_key", &self.hotkeys.start_key),
            ("pause_key", &self.hotkeys.pause_key),
            ("reset_key", &self.hotkeys.reset_key),
        ] {
            if key.trim().is_empty() {
                anyhow::bail!("Пустая клавиша hotkeys.{}", name);
            }
        }

        for (i, stopwatch) in self.stopwatches.iter().enumerate() {
            for key in [&stopwatch.start_key, &stopwatch.pause_key, &stopwatch.reset_key]
                .into_iter()
                .flatten()
            {
                if key.trim().is_empty() {
                    anyhow::bail!("Пустая клавиша в секундомере #{}", i + 1);
                }
            }
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.display.tick_ms)
    }

    /// Секундомеры для старта; пустой список означает один секундомер по умолчанию
    pub fn initial_stopwatches(&self) -> Vec<(Option<String>, HotkeyDefaults)> {
        if self.stopwatches.is_empty() {
            return vec![(None, self.hotkeys.clone())];
        }

        self.stopwatches
            .iter()
            .map(|stopwatch| {
                let keys = HotkeyDefaults {
                    start_key: stopwatch
                        .start_key
                        .clone()
                        .unwrap_or_else(|| self.hotkeys.start_key.clone()),
                    pause_key: stopwatch
                        .pause_key
                        .clone()
                        .unwrap_or_else(|| self.hotkeys.pause_key.clone()),
                    reset_key: stopwatch
                        .reset_key
                        .clone()
                        .unwrap_or_else(|| self.hotkeys.reset_key.clone()),
                };
                (stopwatch.title.clone(), keys)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        config.display.tick_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.hotkeys.pause_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_stopwatches_fallback_to_defaults() {
        let config = Config::default();
        let initial = config.initial_stopwatches();
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].1, HotkeyDefaults::default());

        let mut config = Config::default();
        config.stopwatches = vec![StopwatchConfig {
            title: Some("Сплит".to_string()),
            start_key: Some("F5".to_string()),
            ..Default::default()
        }];
        let initial = config.initial_stopwatches();
        assert_eq!(initial[0].0.as_deref(), Some("Сплит"));
        assert_eq!(initial[0].1.start_key, "F5");
        assert_eq!(initial[0].1.pause_key, "F2");
        assert_eq!(initial[0].1.reset_key, "F3");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[display]
tick_ms = 25

[hotkeys]
start_key = "ctrl+f1"
pause_key = "ctrl+f2"
reset_key = "ctrl+f3"

[[stopwatches]]
title = "Забег"

[[stopwatches]]
start_key = "f9"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.display.tick_ms, 25);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.input.device_path, "auto");

        let initial = config.initial_stopwatches();
        assert_eq!(initial.len(), 2);
        assert_eq!(initial[0].1.start_key, "ctrl+f1");
        assert_eq!(initial[1].0, None);
        assert_eq!(initial[1].1.start_key, "f9");
        assert_eq!(initial[1].1.reset_key, "ctrl+f3");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\ntick_ms = 0").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
