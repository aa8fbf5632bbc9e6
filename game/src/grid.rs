use serde::{Deserialize, Serialize};

use crate::error::MapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Pos {
        self.offset(dir, 1)
    }

    pub fn offset(self, dir: Direction, distance: i32) -> Pos {
        let (dx, dy) = dir.delta();
        Pos::new(self.x + dx * distance, self.y + dy * distance)
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order; path tie-breaking depends on it.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    /// Indestructible.
    Pillar,
    /// Destructible; the agent's resource.
    Wall,
    /// Enemy spawn point.
    Spawner,
    Player,
    Enemy,
    PowerUp,
    Bomb,
    /// Lives only inside the tick that produced it.
    Explosion,
}

impl Cell {
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        Some(match symbol {
            ' ' => Cell::Empty,
            'C' => Cell::Pillar,
            'M' => Cell::Wall,
            'E' => Cell::Spawner,
            'P' => Cell::Player,
            'F' => Cell::Enemy,
            'U' => Cell::PowerUp,
            'B' => Cell::Bomb,
            'X' => Cell::Explosion,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Pillar => 'C',
            Cell::Wall => 'M',
            Cell::Spawner => 'E',
            Cell::Player => 'P',
            Cell::Enemy => 'F',
            Cell::PowerUp => 'U',
            Cell::Bomb => 'B',
            Cell::Explosion => 'X',
        }
    }
}

/// Row-major cell storage plus the set of cells touched since the last reset.
///
/// `place_mark` and `clear` are the only mutators, and both record the cell so
/// a redraw pass can repaint exactly what changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    touched: Vec<Pos>,
    touched_mask: Vec<bool>,
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl Grid {
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Grid, MapError> {
        let first = rows.first().ok_or(MapError::EmptyMap)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(MapError::EmptyRow { row: 0 });
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let actual = row.chars().count();
            if actual == 0 {
                return Err(MapError::EmptyRow { row: y });
            }
            if actual != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let cell =
                    Cell::from_symbol(symbol).ok_or(MapError::UnknownSymbol { x, y, symbol })?;
                cells.push(cell);
            }
        }

        let len = cells.len();
        Ok(Grid {
            width,
            height: rows.len(),
            cells,
            touched: Vec::new(),
            touched_mask: vec![false; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Writes `cell` at `pos`. Out-of-bounds writes are ignored and return `false`.
    pub fn place_mark(&mut self, pos: Pos, cell: Cell) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        self.cells[idx] = cell;
        if !self.touched_mask[idx] {
            self.touched_mask[idx] = true;
            self.touched.push(pos);
        }
        true
    }

    pub fn clear(&mut self, pos: Pos) -> bool {
        self.place_mark(pos, Cell::Empty)
    }

    pub fn is_passable_for_player(&self, pos: Pos) -> bool {
        matches!(self.get(pos), Some(Cell::Empty | Cell::PowerUp))
    }

    pub fn is_passable_for_enemy(&self, pos: Pos) -> bool {
        self.get(pos) == Some(Cell::Empty)
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(idx, &cell)| {
            let pos = Pos::new((idx % width) as i32, (idx / width) as i32);
            (pos, cell)
        })
    }

    pub fn positions_of(&self, kind: Cell) -> Vec<Pos> {
        self.iter()
            .filter(|&(_, cell)| cell == kind)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// Cells written since the last `reset_touched`, each listed once, in first-write order.
    pub fn touched(&self) -> &[Pos] {
        &self.touched
    }

    pub fn reset_touched(&mut self) {
        for pos in self.touched.drain(..) {
            let idx = pos.y as usize * self.width + pos.x as usize;
            self.touched_mask[idx] = false;
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = MapError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Grid::parse(&rows)
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.rows()
    }
}
