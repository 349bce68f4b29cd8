use crate::error::{Result, StopwatchError};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const INPUT_DIR: &str = "/dev/input";

/// Проверить, что глобальные горячие клавиши вообще можно читать
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access(Path::new(INPUT_DIR))?;
    warn_if_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access(input_dir: &Path) -> Result<()> {
    if !input_dir.exists() {
        return Err(StopwatchError::Permission(format!(
            "Директория {} не существует",
            input_dir.display()
        )));
    }

    match fs::read_dir(input_dir) {
        Ok(_) => {
            info!("Доступ к {} подтвержден", input_dir.display());
            Ok(())
        }
        Err(e) => Err(StopwatchError::Permission(format!(
            "Нет доступа к {}: {}. {}",
            input_dir.display(),
            e,
            setup_hint()
        ))),
    }
}

fn warn_if_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Для чтения клавиатуры достаточно группы 'input'");
            warn!("   {}", setup_hint());
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}

/// Как выдать права на чтение клавиатуры без root
pub fn setup_hint() -> &'static str {
    "Добавьте пользователя в группу input: sudo usermod -a -G input $USER (затем перезайдите в систему)"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_dir() {
        let err = check_input_devices_access(Path::new("/non/existent/input")).unwrap_err();
        assert!(matches!(err, StopwatchError::Permission(_)));
    }

    #[test]
    fn test_readable_dir_passes() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_input_devices_access(dir.path()).is_ok());
    }

    #[test]
    fn test_setup_hint() {
        assert!(setup_hint().contains("usermod"));
    }
}
