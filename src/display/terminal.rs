use super::DisplaySurface;
use crate::events::Slot;
use crate::stopwatch::StopwatchFrame;
use std::io::{self, Write};

const CLEAR_TO_END: &str = "\x1b[J";

/// Поверхность для терминала: блок строк, перерисовываемый на месте
pub struct TerminalSurface<W: Write + Send> {
    out: W,
    last: Vec<String>,
    drawn_lines: usize,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: Vec::new(),
            drawn_lines: 0,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn format_line(frame: &StopwatchFrame) -> String {
        let buttons: Vec<String> = Slot::ALL
            .iter()
            .map(|slot| {
                let label = match slot {
                    Slot::Start => "Play",
                    Slot::Pause => "Pause",
                    Slot::Reset => "Reset",
                };
                format!("{} ({})", label, frame.keys.get(*slot))
            })
            .collect();

        format!(
            "{:>4} {:<20} {}  [{:<7}]  {}",
            frame.id.to_string(),
            frame.title,
            frame.elapsed_text(),
            frame.state.to_string(),
            buttons.join(" | ")
        )
    }

    fn move_to_block_start(&mut self) -> io::Result<()> {
        if self.drawn_lines > 0 {
            write!(self.out, "\x1b[{}A\r", self.drawn_lines)?;
        }
        write!(self.out, "{}", CLEAR_TO_END)
    }
}

impl<W: Write + Send> DisplaySurface for TerminalSurface<W> {
    fn render(&mut self, frames: &[StopwatchFrame]) -> io::Result<()> {
        let lines: Vec<String> = frames.iter().map(Self::format_line).collect();
        if lines == self.last {
            return Ok(());
        }

        self.move_to_block_start()?;
        for line in &lines {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;

        self.drawn_lines = lines.len();
        self.last = lines;
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        // Сообщение встаёт на место блока, блок рисуется заново под ним
        let result = self
            .move_to_block_start()
            .and_then(|_| writeln!(self.out, "{}", message))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!("Не удалось вывести сообщение: {}", e);
        }
        self.drawn_lines = 0;
        self.last.clear();
    }
}
