use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use lifekernel::{CellCategory, Grid, GridPos};
use std::io::{self, Write};

pub(crate) fn glyph(alive: bool, category: CellCategory) -> char {
    match (alive, category) {
        (true, CellCategory::Wall) => '#',
        (true, CellCategory::Core) => '@',
        (true, CellCategory::PlayerPlaced) => 'o',
        (true, CellCategory::Ordinary) => '*',
        (false, _) => ' ',
    }
}

fn color(ch: char) -> Color {
    match ch {
        '#' => Color::DarkGrey,
        '@' => Color::Magenta,
        'o' => Color::Red,
        'G' => Color::Green,
        'P' => Color::Yellow,
        _ => Color::White,
    }
}

/// One string per grid row, highest row first. Markers only show on dead
/// cells.
pub(crate) fn frame_lines(grid: &Grid, goal: GridPos, start: GridPos) -> Vec<String> {
    (0..grid.height())
        .rev()
        .map(|y| {
            (0..grid.width())
                .map(|x| {
                    let Some(cell) = grid.get(x, y) else {
                        return ' ';
                    };
                    let ch = glyph(cell.alive(), cell.category());
                    match ch {
                        ' ' if GridPos::new(x, y) == goal => 'G',
                        ' ' if GridPos::new(x, y) == start => 'P',
                        other => other,
                    }
                })
                .collect()
        })
        .collect()
}

pub(crate) struct Terminal {
    out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;
        Ok(Self { out, cols, rows })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Draws the grid rows then a status line, clipped to the terminal.
    pub(crate) fn present(&mut self, lines: &[String], status: &str) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        let max_rows = self.rows.saturating_sub(1) as usize;
        let max_cols = self.cols as usize;

        for (y, line) in lines.iter().take(max_rows).enumerate() {
            queue!(self.out, cursor::MoveTo(0, y as u16))?;
            let mut last = None;
            for ch in line.chars().take(max_cols) {
                let c = color(ch);
                if last != Some(c) {
                    queue!(self.out, SetForegroundColor(c))?;
                    last = Some(c);
                }
                queue!(self.out, Print(ch))?;
            }
        }

        let status: String = status.chars().take(max_cols).collect();
        queue!(
            self.out,
            cursor::MoveTo(0, self.rows.saturating_sub(1)),
            SetForegroundColor(Color::Grey),
            Print(status),
            Clear(ClearType::UntilNewLine),
            ResetColor,
            EndSynchronizedUpdate
        )?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_only_on_dead_cells() {
        let mut grid = Grid::new(3, 2, 1.0).unwrap();
        grid.set_alive(0, 0, true, CellCategory::Wall);
        grid.set_alive(2, 1, true, CellCategory::Core);
        let lines = frame_lines(&grid, GridPos::new(2, 1), GridPos::new(1, 0));
        assert_eq!(lines, vec!["  @".to_string(), "#P ".to_string()]);
    }
}
