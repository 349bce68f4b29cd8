use crate::stopwatch::StopwatchId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Одно из трёх управляемых действий секундомера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Start,
    Pause,
    Reset,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Start, Slot::Pause, Slot::Reset];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::Start => "start",
            Slot::Pause => "pause",
            Slot::Reset => "reset",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" | "play" => Ok(Slot::Start),
            "pause" | "stop" => Ok(Slot::Pause),
            "reset" => Ok(Slot::Reset),
            other => Err(format!("неизвестный слот '{}' (start, pause, reset)", other)),
        }
    }
}

/// Действие, привязанное к горячей клавише
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HotkeyAction {
    Start(StopwatchId),
    Pause(StopwatchId),
    Reset(StopwatchId),
}

impl HotkeyAction {
    pub fn new(slot: Slot, id: StopwatchId) -> Self {
        match slot {
            Slot::Start => HotkeyAction::Start(id),
            Slot::Pause => HotkeyAction::Pause(id),
            Slot::Reset => HotkeyAction::Reset(id),
        }
    }

    pub fn slot(&self) -> Slot {
        match self {
            HotkeyAction::Start(_) => Slot::Start,
            HotkeyAction::Pause(_) => Slot::Pause,
            HotkeyAction::Reset(_) => Slot::Reset,
        }
    }

    pub fn target(&self) -> StopwatchId {
        match *self {
            HotkeyAction::Start(id) | HotkeyAction::Pause(id) | HotkeyAction::Reset(id) => id,
        }
    }
}

impl fmt::Display for HotkeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.slot(), self.target())
    }
}

/// Нажатие зарегистрированной горячей клавиши, пойманное слушателем
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyEvent {
    pub key: String,
    pub timestamp: std::time::Instant,
}

impl HotkeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            timestamp: std::time::Instant::now(),
        }
    }
}

impl fmt::Display for HotkeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}мс назад)", self.key, self.timestamp.elapsed().as_millis())
    }
}
