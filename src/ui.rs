use std::collections::HashMap;
use std::io::{self, stdout, Write};

use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor, Stylize},
    terminal::{self, ClearType},
};
use itertools::Itertools;

use crate::drill::SessionResult;

/// Rendering boundary for the drill loop: clearing and the in-progress
/// sequence view. Result tables are printed separately, after the
/// terminal has left raw mode.
pub trait Screen {
    fn clear(&mut self) -> io::Result<()>;
    fn show_sequence(&mut self, sequence: &str, cursor: usize) -> io::Result<()>;
}

/// Crossterm-backed screen. The typed prefix renders plain, the expected
/// character red, and the untyped remainder blue.
pub struct TerminalScreen;

impl Screen for TerminalScreen {
    fn clear(&mut self) -> io::Result<()> {
        execute!(
            stdout(),
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )
    }

    fn show_sequence(&mut self, sequence: &str, cursor: usize) -> io::Result<()> {
        let chars: Vec<char> = sequence.chars().collect();
        let Some(&current) = chars.get(cursor) else {
            return Ok(());
        };
        let typed: String = chars[..cursor].iter().collect();
        let rest: String = chars[cursor + 1..].iter().collect();

        let mut out = stdout();
        execute!(
            out,
            Print(typed),
            SetForegroundColor(Color::Red),
            Print(current),
            SetForegroundColor(Color::Blue),
            Print(rest),
            ResetColor,
            Print("\r\n"),
        )?;
        out.flush()
    }
}

/// Captures screen activity so the drill loop can run without a terminal.
#[derive(Debug, Default)]
pub struct RecordingScreen {
    pub clears: usize,
    /// Cursor position of every rendered frame.
    pub frames: Vec<usize>,
}

impl Screen for RecordingScreen {
    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        Ok(())
    }

    fn show_sequence(&mut self, _sequence: &str, cursor: usize) -> io::Result<()> {
        self.frames.push(cursor);
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct Cell {
    text: String,
    highlight: bool,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: false,
        }
    }

    fn green(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: true,
        }
    }
}

/// Double-border box table. Column widths are computed from the plain
/// text; highlighting is applied only when the cell is emitted.
fn render_table(headers: &[&str], rows: &[Vec<Cell>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.text.chars().count());
        }
    }

    let edge = |left: char, mid: char, right: char| {
        let mut line = String::new();
        line.push(left);
        for (i, w) in widths.iter().enumerate() {
            line.push_str(&"═".repeat(w + 2));
            line.push(if i + 1 == widths.len() { right } else { mid });
        }
        line
    };

    let mut out = String::new();
    out.push_str(&edge('╔', '╦', '╗'));
    out.push('\n');
    out.push('║');
    for (i, header) in headers.iter().enumerate() {
        out.push_str(&format!(" {:w$} ║", header, w = widths[i]));
    }
    out.push('\n');
    out.push_str(&edge('╠', '╬', '╣'));
    out.push('\n');
    for row in rows {
        out.push('║');
        for (i, cell) in row.iter().enumerate() {
            let padded = format!("{:w$}", cell.text, w = widths[i]);
            if cell.highlight {
                out.push_str(&format!(" {} ║", padded.green()));
            } else {
                out.push_str(&format!(" {} ║", padded));
            }
        }
        out.push('\n');
    }
    out.push_str(&edge('╚', '╩', '╝'));
    out
}

pub fn render_speed_table(result: &SessionResult) -> String {
    render_table(
        &["Words", "Time taken (s)", "Words per minute"],
        &[vec![
            Cell::plain(result.word_count.to_string()),
            Cell::plain(format!("{:.2}", result.elapsed_secs)),
            Cell::green(format!("{:.2}", result.wpm)),
        ]],
    )
}

pub fn render_accuracy_table(result: &SessionResult) -> String {
    render_table(
        &["Total characters", "Total mistakes", "Accuracy"],
        &[vec![
            Cell::plain(result.total_chars.to_string()),
            Cell::plain(result.total_mistakes.to_string()),
            Cell::green(format!("{}%", result.accuracy.trunc() as i64)),
        ]],
    )
}

/// The per-character mistake table, worst offenders first. A clean run
/// gets a congratulations line instead.
pub fn render_mistakes(mistakes: &HashMap<char, u32>) -> String {
    if mistakes.is_empty() {
        return "Congrats! You completed the level with no mistakes: that's awesome!"
            .green()
            .to_string();
    }

    let rows: Vec<Vec<Cell>> = mistakes
        .iter()
        .sorted_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)))
        .map(|(c, count)| {
            // A bare space in the table reads as an empty cell.
            let label = if *c == ' ' {
                "<Space>".to_string()
            } else {
                c.to_string()
            };
            vec![Cell::plain(label), Cell::plain(count.to_string())]
        })
        .collect();
    render_table(&["Character", "Mistakes"], &rows)
}

pub fn print_results(result: &SessionResult) {
    println!("{}", render_speed_table(result));
    println!("{}", render_accuracy_table(result));
    println!("{}", render_mistakes(&result.mistakes));
}
