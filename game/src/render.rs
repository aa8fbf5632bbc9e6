use engine::canvas::{Canvas, Rgba};

use crate::grid::{Cell, Grid, Pos};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    Gray,
    Brown,
    Blue,
    Green,
    Red,
    Yellow,
    White,
    Black,
}

impl CellColor {
    /// X11 values for the named colors.
    pub const fn rgba(self) -> Rgba {
        match self {
            CellColor::Gray => [190, 190, 190, 255],
            CellColor::Brown => [165, 42, 42, 255],
            CellColor::Blue => [0, 0, 255, 255],
            CellColor::Green => [0, 255, 0, 255],
            CellColor::Red => [255, 0, 0, 255],
            CellColor::Yellow => [255, 255, 0, 255],
            CellColor::White => [255, 255, 255, 255],
            CellColor::Black => [0, 0, 0, 255],
        }
    }
}

pub fn color_for_cell(cell: Cell) -> CellColor {
    match cell {
        Cell::Pillar => CellColor::Gray,
        Cell::Wall => CellColor::Brown,
        Cell::Spawner => CellColor::Blue,
        Cell::Player => CellColor::Green,
        Cell::Enemy => CellColor::Red,
        Cell::PowerUp => CellColor::Yellow,
        Cell::Bomb => CellColor::White,
        // Explosions never survive a tick, so they paint as background.
        Cell::Empty | Cell::Explosion => CellColor::Black,
    }
}

fn draw(grid: &Grid, pos: Pos, canvas: &mut dyn Canvas) -> bool {
    let Some(cell) = grid.get(pos) else {
        return false;
    };
    canvas.draw_cell(pos.x as usize, pos.y as usize, color_for_cell(cell).rgba());
    true
}

/// Paints every cell.
pub fn draw_full(grid: &Grid, canvas: &mut dyn Canvas) {
    for (pos, cell) in grid.iter() {
        canvas.draw_cell(pos.x as usize, pos.y as usize, color_for_cell(cell).rgba());
    }
}

/// Drains the session's changed cells into redraw commands, and closes the
/// canvas exactly once when the game ends.
#[derive(Debug, Default)]
pub struct RedrawObserver {
    closed: bool,
}

impl RedrawObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the number of cells redrawn.
    pub fn present(&mut self, session: &mut Session, canvas: &mut dyn Canvas) -> usize {
        if self.closed {
            return 0;
        }
        let touched = session.take_touched();
        let grid = session.grid();
        let mut drawn = 0;
        for pos in touched {
            if draw(grid, pos, canvas) {
                drawn += 1;
            }
        }
        if session.is_over() {
            canvas.close();
            self.closed = true;
        }
        drawn
    }
}
