// Tile geometry for the board area and mouse hit testing

use ratatui::layout::Rect;

pub const TILE_W: u16 = 6; // wide enough for "Schatz"
pub const TILE_H: u16 = 3;
pub const GAP_X: u16 = 1;
pub const GAP_Y: u16 = 0;

/// Pixel (cell) placement of every tile, in terminal coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardGeometry {
    pub origin: (u16, u16), // Top-left terminal cell of tile (0, 0)
    pub cols: usize,
    pub rows: usize,
}

/// Terminal columns and rows needed by a board of `cols` x `rows` tiles
pub fn board_size(cols: usize, rows: usize) -> (u16, u16) {
    let cols = cols as u16;
    let rows = rows as u16;
    (
        cols * TILE_W + cols.saturating_sub(1) * GAP_X,
        rows * TILE_H + rows.saturating_sub(1) * GAP_Y,
    )
}

fn contains(r: Rect, column: u16, row: u16) -> bool {
    column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
}

impl BoardGeometry {
    /// Center the tiles inside `area`
    pub fn centered(cols: usize, rows: usize, area: Rect) -> Self {
        let (w, h) = board_size(cols, rows);
        BoardGeometry {
            origin: (
                area.x + area.width.saturating_sub(w) / 2,
                area.y + area.height.saturating_sub(h) / 2,
            ),
            cols,
            rows,
        }
    }

    /// Area covered by all tiles
    pub fn bounds(&self) -> Rect {
        let (w, h) = board_size(self.cols, self.rows);
        Rect::new(self.origin.0, self.origin.1, w, h)
    }

    pub fn tile_rect(&self, x: usize, y: usize) -> Rect {
        let left = self.origin.0 + x as u16 * (TILE_W + GAP_X);
        let top = self.origin.1 + y as u16 * (TILE_H + GAP_Y);
        Rect::new(left, top, TILE_W, TILE_H)
    }

    /// Board coordinates of the tile under a terminal cell, if any
    pub fn spot_clicked(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        if !contains(self.bounds(), column, row) {
            return None;
        }
        for x in 0..self.cols {
            for y in 0..self.rows {
                if contains(self.tile_rect(x, y), column, row) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}
