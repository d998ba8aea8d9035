//! # Character Display Abstraction
//!
//! The station writes two lines of text to a character LCD behind the
//! [`CharDisplay`] trait: `clear`, `set_cursor`, `print`. Positions are
//! zero-based; printing overwrites in place and never wraps, so callers pad
//! lines to the full display width themselves (see the presenter).
//!
//! [`TerminalDisplay`] is the development implementation: an in-memory
//! character grid repainted to the terminal whenever its contents change.
//! Tests run it headless and assert on the grid directly.

use thiserror::Error;

/// Errors from display operations.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("cursor ({col}, {row}) outside the {columns}x{rows} display")]
    OutOfBounds {
        col: usize,
        row: usize,
        columns: usize,
        rows: usize,
    },
    #[error("display bus error: {0}")]
    Bus(String),
}

/// Character LCD driver interface (HD44780-style).
pub trait CharDisplay {
    /// Blank the whole display and home the cursor.
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor. Zero-based column and row.
    fn set_cursor(&mut self, col: usize, row: usize) -> Result<(), DisplayError>;

    /// Write text at the cursor, overwriting in place. Text running past the
    /// last column is dropped; there is no line wrap.
    fn print(&mut self, text: &str) -> Result<(), DisplayError>;
}

/// Terminal-backed character grid for development and tests.
pub struct TerminalDisplay {
    columns: usize,
    rows: usize,
    cells: Vec<Vec<char>>,
    cursor_col: usize,
    cursor_row: usize,
    echo: bool,
}

impl TerminalDisplay {
    /// A display that repaints itself to stdout on every content change.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self::build(columns, rows, true)
    }

    /// A silent display for tests; inspect it with [`line`](Self::line).
    pub fn headless(columns: usize, rows: usize) -> Self {
        Self::build(columns, rows, false)
    }

    fn build(columns: usize, rows: usize, echo: bool) -> Self {
        TerminalDisplay {
            columns: columns.max(1),
            rows: rows.max(1),
            cells: vec![vec![' '; columns.max(1)]; rows.max(1)],
            cursor_col: 0,
            cursor_row: 0,
            echo,
        }
    }

    /// One row of the grid as a string, trailing padding included.
    pub fn line(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }

    fn repaint(&self) {
        if !self.echo {
            return;
        }
        let border = "-".repeat(self.columns);
        println!("+{}+", border);
        for row in &self.cells {
            let text: String = row.iter().collect();
            println!("|{}|", text);
        }
        println!("+{}+", border);
    }
}

impl CharDisplay for TerminalDisplay {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for row in &mut self.cells {
            row.fill(' ');
        }
        self.cursor_col = 0;
        self.cursor_row = 0;
        self.repaint();
        Ok(())
    }

    fn set_cursor(&mut self, col: usize, row: usize) -> Result<(), DisplayError> {
        if col >= self.columns || row >= self.rows {
            return Err(DisplayError::OutOfBounds {
                col,
                row,
                columns: self.columns,
                rows: self.rows,
            });
        }
        self.cursor_col = col;
        self.cursor_row = row;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        let mut changed = false;
        for ch in text.chars() {
            if self.cursor_col >= self.columns {
                break; // clipped, per the no-wrap contract
            }
            let cell = &mut self.cells[self.cursor_row][self.cursor_col];
            if *cell != ch {
                *cell = ch;
                changed = true;
            }
            self.cursor_col += 1;
        }
        if changed {
            self.repaint();
        }
        Ok(())
    }
}
