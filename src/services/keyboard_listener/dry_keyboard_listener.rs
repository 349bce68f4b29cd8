use crate::error::Result;
use crate::events::HotkeyEvent;
use crate::services::input_hook::WatchedChords;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use super::r#trait::KeyboardListenerTrait;

/// Слушатель без устройства: горячие клавиши подаются командой `press <key>`
pub struct DryRunKeyboardListener {
    watched: WatchedChords,
    events: UnboundedSender<HotkeyEvent>,
}

impl DryRunKeyboardListener {
    pub fn new(watched: WatchedChords, events: UnboundedSender<HotkeyEvent>) -> Result<Self> {
        info!("Инициализация DryRunKeyboardListener");
        Ok(Self { watched, events })
    }

    async fn run_impl(self) -> Result<()> {
        info!("Dry-run режим - KeyboardListener работает в режиме эмуляции");
        info!("Используйте команду 'press <клавиша>' для имитации нажатия");

        loop {
            tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            if self.events.is_closed() {
                info!("Получатель горячих клавиш закрыт, dry-run слушатель останавливается");
                return Ok(());
            }
            debug!(
                "KeyboardListener работает в dry-run режиме ({} отслеживаемых комбинаций)",
                self.watched.len()
            );
        }
    }
}

#[async_trait::async_trait]
impl KeyboardListenerTrait for DryRunKeyboardListener {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}
