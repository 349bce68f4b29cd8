use crate::events::Slot;
use crate::stopwatch::StopwatchId;
use std::io::BufRead;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

pub const HELP: &str = "\
Команды:
  add                               добавить секундомер
  remove <id>                       удалить секундомер
  start|pause|reset <id>            управлять секундомером
  rebind <id> <start|pause|reset> <клавиша>
                                    переназначить клавишу (например: rebind 1 start ctrl+f5)
  title <id> <текст>                переименовать
  press <клавиша>                   имитировать нажатие (f1 и F1 равнозначны)
  help                              эта справка
  quit                              выход";

/// Действия пользователя над секундомерами
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Add,
    Remove(StopwatchId),
    Control(StopwatchId, Slot),
    Rebind {
        id: StopwatchId,
        slot: Slot,
        key: String,
    },
    Rename {
        id: StopwatchId,
        title: String,
    },
    Press(String),
    Help,
    Quit,
}

impl UiCommand {
    /// Разбор строки; пустая строка даёт `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "add" => UiCommand::Add,
            "remove" | "rm" => UiCommand::Remove(parse_id(rest)?),
            "start" | "play" => UiCommand::Control(parse_id(rest)?, Slot::Start),
            "pause" => UiCommand::Control(parse_id(rest)?, Slot::Pause),
            "reset" => UiCommand::Control(parse_id(rest)?, Slot::Reset),
            "rebind" => {
                let mut parts = rest.split_whitespace();
                let id = parse_id(parts.next().unwrap_or(""))?;
                let slot = parts
                    .next()
                    .ok_or("rebind: не указан слот")?
                    .parse::<Slot>()?;
                // Пустая клавиша допустима: это отмена, привязка не меняется
                let key = parts.collect::<Vec<_>>().join(" ");
                UiCommand::Rebind { id, slot, key }
            }
            "title" | "rename" => {
                let (id, title) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                UiCommand::Rename {
                    id: parse_id(id)?,
                    title: title.trim().to_string(),
                }
            }
            "press" => {
                if rest.is_empty() {
                    return Err("press: не указана клавиша".to_string());
                }
                UiCommand::Press(rest.to_string())
            }
            "help" | "?" => UiCommand::Help,
            "quit" | "exit" => UiCommand::Quit,
            other => return Err(format!("неизвестная команда '{}' (help - список команд)", other)),
        };

        Ok(Some(command))
    }
}

fn parse_id(text: &str) -> Result<StopwatchId, String> {
    let digits = text.trim().trim_start_matches('#');
    digits
        .parse::<u64>()
        .map(StopwatchId)
        .map_err(|_| format!("ожидался номер секундомера, получено '{}'", text.trim()))
}

/// Читать команды со stdin в отдельном потоке.
///
/// Обычный поток, а не задача tokio: блокирующее чтение stdin не должно
/// задерживать остановку рантайма.
pub fn spawn_stdin_reader(lines: UnboundedSender<String>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if lines.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!("Ошибка чтения stdin: {}", e);
                    break;
                }
            }
        }
        info!("Ввод команд завершён");
    })
}
