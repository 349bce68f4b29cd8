use crate::stopwatch::StopwatchId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StopwatchError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    /// Слой глобальных горячих клавиш отказался привязать клавишу
    #[error("Не удалось привязать горячую клавишу: {0}")]
    InputHook(String),

    #[error("Нельзя удалить последний секундомер")]
    MinimumCollectionSize,

    #[error("Секундомер {0} не найден")]
    UnknownStopwatch(StopwatchId),

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),
}

impl StopwatchError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(StopwatchError::DeviceNotFound(msg.into()))
    }

    /// Ошибка, которую пользователь может исправить без перезапуска
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StopwatchError::InputHook(_)
                | StopwatchError::MinimumCollectionSize
                | StopwatchError::UnknownStopwatch(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StopwatchError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! stopwatch_error {
    (input_hook, $($arg:tt)*) => {
        $crate::error::StopwatchError::InputHook(format!($($arg)*))
    };
    (device_not_found, $($arg:tt)*) => {
        $crate::error::StopwatchError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::StopwatchError::Permission(format!($($arg)*))
    };
}
