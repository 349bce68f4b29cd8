pub mod clock;
pub mod collection;
pub mod controller;
pub mod timer;

pub use clock::{Clock, SystemClock};
pub use collection::CollectionManager;
pub use controller::StopwatchFrame;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор секундомера, уникальный в пределах процесса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StopwatchId(pub u64);

impl fmt::Display for StopwatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
