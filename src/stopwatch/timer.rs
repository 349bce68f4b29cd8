use super::clock::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Состояние секундомера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerState {
    Reset,
    Running,
    Paused,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerState::Reset => "reset",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        };
        write!(f, "{}", name)
    }
}

/// Секундомер: накопленное время плюс якорь текущего интервала.
///
/// Пока таймер запущен, `anchor` хранит показание часов за вычетом уже
/// накопленного времени, поэтому `now - anchor` сразу даёт полное время.
pub struct Timer {
    clock: Arc<dyn Clock>,
    state: TimerState,
    accumulated: Duration,
    anchor: Option<Duration>,
}

impl Timer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: TimerState::Reset,
            accumulated: Duration::ZERO,
            anchor: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn start(&mut self) {
        if self.state == TimerState::Running {
            return;
        }
        self.anchor = Some(self.clock.now().saturating_sub(self.accumulated));
        self.state = TimerState::Running;
    }

    pub fn pause(&mut self) {
        if self.state != TimerState::Running {
            return;
        }
        if let Some(anchor) = self.anchor.take() {
            self.accumulated = self.clock.now().saturating_sub(anchor);
        }
        self.state = TimerState::Paused;
    }

    /// Сброс в ноль из любого состояния; запущенный таймер останавливается
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.anchor = None;
        self.state = TimerState::Reset;
    }

    pub fn elapsed(&self) -> Duration {
        match (self.state, self.anchor) {
            (TimerState::Running, Some(anchor)) => self.clock.now().saturating_sub(anchor),
            _ => self.accumulated,
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("state", &self.state)
            .field("accumulated", &self.accumulated)
            .field("anchor", &self.anchor)
            .finish()
    }
}

/// Формат `HH:MM:SS:mmm`; часы не сворачиваются по модулю суток
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = elapsed.subsec_millis();
    format!("{:02}:{:02}:{:02}:{:03}", hours, minutes, seconds, millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopwatch::clock::ManualClock;

    fn timer() -> (Arc<ManualClock>, Timer) {
        let clock = Arc::new(ManualClock::new());
        let timer = Timer::new(clock.clone());
        (clock, timer)
    }

    #[test]
    fn test_new_timer_is_reset() {
        let (_clock, timer) = timer();
        assert_eq!(timer.state(), TimerState::Reset);
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_elapsed_grows_while_running_and_freezes_while_paused() {
        let (clock, mut timer) = timer();
        timer.start();

        let mut previous = timer.elapsed();
        for _ in 0..5 {
            clock.advance_ms(120);
            let current = timer.elapsed();
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, Duration::from_millis(600));

        timer.pause();
        assert_eq!(timer.state(), TimerState::Paused);
        clock.advance_ms(10_000);
        assert_eq!(timer.elapsed(), Duration::from_millis(600));
    }

    #[test]
    fn test_resume_keeps_accumulated_time() {
        let (clock, mut timer) = timer();
        timer.start();
        clock.advance_ms(100);
        timer.pause();

        // Время на паузе не считается
        clock.advance_ms(500);

        timer.start();
        clock.advance_ms(100);
        assert_eq!(timer.elapsed(), Duration::from_millis(200));
        timer.pause();
        assert_eq!(timer.elapsed(), Duration::from_millis(200));
    }

    #[test]
    fn test_start_and_pause_are_idempotent() {
        let (clock, mut timer) = timer();
        timer.pause();
        assert_eq!(timer.state(), TimerState::Reset);

        timer.start();
        clock.advance_ms(300);
        timer.start();
        clock.advance_ms(300);
        assert_eq!(timer.elapsed(), Duration::from_millis(600));

        timer.pause();
        clock.advance_ms(300);
        timer.pause();
        assert_eq!(timer.elapsed(), Duration::from_millis(600));
    }

    #[test]
    fn test_reset_from_any_state() {
        let (clock, mut timer) = timer();

        timer.reset();
        assert_eq!(timer.state(), TimerState::Reset);

        timer.start();
        clock.advance_ms(250);
        timer.reset();
        assert_eq!(timer.state(), TimerState::Reset);
        assert_eq!(timer.elapsed(), Duration::ZERO);

        // После сброса время не идёт
        clock.advance_ms(250);
        assert_eq!(timer.elapsed(), Duration::ZERO);

        timer.start();
        clock.advance_ms(250);
        timer.pause();
        timer.reset();
        assert_eq!(timer.state(), TimerState::Reset);
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_start_after_clock_has_run() {
        let (clock, mut timer) = timer();
        clock.advance_ms(42_000);
        timer.start();
        clock.advance_ms(7);
        assert_eq!(timer.elapsed(), Duration::from_millis(7));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00:000");
        assert_eq!(format_elapsed(Duration::from_millis(1_500)), "00:00:01:500");
        assert_eq!(
            format_elapsed(Duration::from_millis(3_723_045)),
            "01:02:03:045"
        );
        // Микросекунды отбрасываются
        assert_eq!(format_elapsed(Duration::from_micros(999_999)), "00:00:00:999");
        assert_eq!(format_elapsed(Duration::from_secs(100 * 3600)), "100:00:00:000");
    }
}
