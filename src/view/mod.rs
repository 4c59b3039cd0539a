mod dashboard;
mod shared;

use std::io::{self, Write};
use crossterm::{execute, cursor, queue, style::{Color, SetForegroundColor, ResetColor, Print}, terminal};

use crate::controller::StatsSnapshot;
use crate::layout::Layout;
use crate::model::Snapshot;

pub use dashboard::{dashboard_lines, Line};
pub use shared::{bar, format_bytes, format_number, sparkline, truncate_str};

pub struct Presenter;

/// Minimum terminal dimensions for usable rendering.
pub const MIN_COLS: u16 = 60;
pub const MIN_ROWS: u16 = 10;

impl Presenter {
    /// Check if the terminal is large enough. If not, render a "too small"
    /// message and return `true` (meaning "skip normal rendering").
    pub fn render_size_guard() -> io::Result<bool> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            let mut out = std::io::stdout();
            execute!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
            let msg = format!(
                "Terminal too small ({}x{}). Resize to at least {}x{}.",
                cols, rows, MIN_COLS, MIN_ROWS
            );
            let y = rows / 2;
            let x = cols.saturating_sub(msg.len() as u16) / 2;
            queue!(out, cursor::MoveTo(x, y), SetForegroundColor(Color::Yellow))?;
            write!(out, "{}", msg)?;
            queue!(out, ResetColor)?;
            out.flush()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Redraw the whole dashboard.
    pub fn render(snapshot: Option<&Snapshot>, stats: &StatsSnapshot, layout: &Layout) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let mut out = io::stdout();
        queue!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;

        let lines = dashboard_lines(snapshot, stats, layout, cols as usize);
        // Leave the bottom row for the help line.
        for line in lines.iter().take(rows.saturating_sub(1) as usize) {
            match line {
                Line::Header(text) => shared::write_section_header(&mut out, text)?,
                Line::Text(text) => shared::writeln(&mut out, text)?,
            }
        }

        let help = "q: Quit | Ctrl+C: Force Quit | 1-4: Expand/Collapse section";
        queue!(
            out,
            cursor::MoveTo(1, rows.saturating_sub(1)),
            SetForegroundColor(Color::DarkGrey),
            Print(truncate_str(help, cols.saturating_sub(1) as usize)),
            ResetColor
        )?;
        out.flush()
    }

    /// One JSON object per snapshot, for headless mode.
    pub fn json_line(snapshot: &Snapshot) -> serde_json::Result<String> {
        serde_json::to_string(snapshot)
    }
}
