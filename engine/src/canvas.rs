//! The drawing contract between a simulation and whatever presents it.
//!
//! Games only ever say "paint grid cell (x, y) with this color" and, once, "close".
//! Headless runs use [`RecordingCanvas`] or [`RgbaCanvas`]; the window presenter
//! paints straight into its pixel buffer.

use sha2::{Digest, Sha256};

pub type Rgba = [u8; 4];

pub const DEFAULT_CELL_SIZE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel size of a `columns` x `rows` grid of square cells.
    pub fn for_grid(columns: usize, rows: usize, cell_size: u32) -> Self {
        Self {
            width: (columns as u32).saturating_mul(cell_size),
            height: (rows as u32).saturating_mul(cell_size),
        }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

pub trait Canvas {
    fn draw_cell(&mut self, x: usize, y: usize, color: Rgba);

    /// Releases the display. Nothing is drawn after this.
    fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    Cell { x: usize, y: usize, color: Rgba },
    Close,
}

/// Keeps every command in order, for headless assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn cells_drawn(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Cell { .. }))
            .count()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.contains(&DrawCommand::Close)
    }
}

impl Canvas for RecordingCanvas {
    fn draw_cell(&mut self, x: usize, y: usize, color: Rgba) {
        self.commands.push(DrawCommand::Cell { x, y, color });
    }

    fn close(&mut self) {
        self.commands.push(DrawCommand::Close);
    }
}

/// An in-memory RGBA frame where each grid cell is a `cell_size` square.
#[derive(Debug, Clone)]
pub struct RgbaCanvas {
    size: SurfaceSize,
    cell_size: u32,
    buf: Vec<u8>,
    closed: bool,
}

impl RgbaCanvas {
    pub fn for_grid(columns: usize, rows: usize, cell_size: u32) -> Self {
        let size = SurfaceSize::for_grid(columns, rows, cell_size);
        Self {
            size,
            cell_size,
            buf: vec![0u8; size.rgba_len()],
            closed: false,
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn frame(&self) -> &[u8] {
        &self.buf
    }

    pub fn pixel(&self, px: u32, py: u32) -> Option<Rgba> {
        if px >= self.size.width || py >= self.size.height {
            return None;
        }
        let idx = ((py as usize) * (self.size.width as usize) + px as usize) * 4;
        let px = self.buf.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn sha256_hex(&self) -> String {
        rgba_sha256_hex(&self.buf)
    }
}

impl Canvas for RgbaCanvas {
    fn draw_cell(&mut self, x: usize, y: usize, color: Rgba) {
        if self.closed {
            return;
        }
        paint_cell(&mut self.buf, self.size, self.cell_size, x, y, color);
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

pub fn paint_cell(
    frame: &mut [u8],
    size: SurfaceSize,
    cell_size: u32,
    x: usize,
    y: usize,
    color: Rgba,
) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    fill_rect(
        frame,
        size.width,
        size.height,
        x.saturating_mul(cell_size),
        y.saturating_mul(cell_size),
        cell_size,
        cell_size,
        color,
    );
}

/// Fills a clipped rectangle; frames shorter than `width * height * 4` are left alone.
#[allow(clippy::too_many_arguments)]
pub fn fill_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    color: Rgba,
) {
    let max_x = x.saturating_add(w).min(width);
    let max_y = y.saturating_add(h).min(height);
    if x >= max_x || y >= max_y {
        return;
    }

    let stride = width as usize * 4;
    let expected_len = stride.saturating_mul(height as usize);
    if expected_len == 0 || frame.len() < expected_len {
        return;
    }

    let row_bytes = (max_x - x) as usize * 4;
    let mut row_start = y as usize * stride + x as usize * 4;
    for _ in y..max_y {
        for px in frame[row_start..row_start + row_bytes].chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
        row_start += stride;
    }
}
