use crate::error::Result;
use tracing::info;

use super::r#trait::InputHook;

/// Хук для dry-run режима: принимает любые клавиши и только пишет в лог
pub struct DryRunInputHook;

impl DryRunInputHook {
    pub fn new() -> Self {
        info!("Инициализация DryRunInputHook");
        Self
    }
}

impl Default for DryRunInputHook {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHook for DryRunInputHook {
    fn bind(&self, key: &str) -> Result<()> {
        info!("[DRY RUN] Привязка клавиши '{}'", key);
        Ok(())
    }

    fn unbind(&self, key: &str) -> Result<()> {
        info!("[DRY RUN] Отвязка клавиши '{}'", key);
        Ok(())
    }
}
