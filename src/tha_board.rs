// Board model: treasure placement, neighbor counts, reveals and group ids
// The board owns every cell; the UI and the hint generator borrow it

use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// Group ids double on every safe reveal, so a board may not hold more cells
/// than the id has bits.
pub const MAX_CELLS: usize = u128::BITS as usize;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board must be at least 1x1")]
    InvalidSize,
    #[error("Board of {0} cells is too large")]
    TooLarge(usize),
    #[error("{treasures} treasures do not fit a board of {cells} cells")]
    TooManyTreasures { treasures: usize, cells: usize },
    #[error("Invalid coordinates ({0}, {1})")]
    InvalidCoords(usize, usize),
}

pub type Result<T> = core::result::Result<T, BoardError>;

/// A single tile of the treasure board
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub opened: bool,   // Revealed by the player
    pub treasure: bool, // Holds a treasure (fixed after planting)
    pub info: u8,       // Treasures among the up-to-8 neighbors
    pub group: u128,    // Heuristic group id, see Board::regroup
}

/// Result of opening a tile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    AlreadyOpen,
    Treasure,
    Safe(u8),
}

/// Every in-bounds cell around (x, y), the cell itself excluded.
/// Yields 3 cells in a corner, 5 on an edge and 8 inside a board of 3x3 or more.
pub fn neighbors(w: usize, h: usize, x: usize, y: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(8);
    for ox in x.saturating_sub(1)..=(x + 1).min(w.saturating_sub(1)) {
        for oy in y.saturating_sub(1)..=(y + 1).min(h.saturating_sub(1)) {
            if ox == x && oy == y {
                continue;
            }
            out.push((ox, oy));
        }
    }
    out
}

#[derive(Clone, Debug)]
pub struct Board {
    w: usize,
    h: usize,
    treasures: usize, // Planting target
    cells: Vec<Cell>, // Column-major: index = x * h + y
}

impl Board {
    /// Create an empty board, nothing planted yet
    pub fn new(w: usize, h: usize, treasures: usize) -> Result<Self> {
        if w == 0 || h == 0 {
            return Err(BoardError::InvalidSize);
        }
        let cells = w * h;
        if cells > MAX_CELLS {
            return Err(BoardError::TooLarge(cells));
        }
        // at least one safe tile, otherwise the planter never terminates on a full board
        if treasures >= cells {
            return Err(BoardError::TooManyTreasures { treasures, cells });
        }
        Ok(Board {
            w,
            h,
            treasures,
            cells: vec![Cell::default(); cells],
        })
    }

    /// Create a board with treasures at fixed coordinates.
    /// Duplicates are planted once; the target becomes the distinct count.
    pub fn with_treasures(w: usize, h: usize, coords: &[(usize, usize)]) -> Result<Self> {
        let mut board = Board::new(w, h, 0)?;
        let mut planted = 0;
        for &(x, y) in coords {
            board.check(x, y)?;
            if board.plant_treasure_at(x, y) {
                planted += 1;
            }
        }
        if planted >= w * h {
            return Err(BoardError::TooManyTreasures {
                treasures: planted,
                cells: w * h,
            });
        }
        board.treasures = planted;
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Configured treasure total
    pub fn treasures(&self) -> usize {
        self.treasures
    }

    fn index(&self, x: usize, y: usize) -> usize {
        x * self.h + y
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        if x < self.w && y < self.h {
            Ok(())
        } else {
            Err(BoardError::InvalidCoords(x, y))
        }
    }

    /// The cell at (x, y), or None when out of range
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        self.check(x, y).ok().map(|()| &self.cells[self.index(x, y)])
    }

    /// Panics on out-of-range coordinates, like slice indexing; see `get`
    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        assert!(x < self.w && y < self.h, "cell ({x}, {y}) out of range");
        &self.cells[self.index(x, y)]
    }

    pub fn neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        neighbors(self.w, self.h, x, y)
    }

    /// Plant a treasure at (x, y) unless one is already there.
    /// Bumps the neighbor count of every adjacent cell on success.
    pub fn plant_treasure_at(&mut self, x: usize, y: usize) -> bool {
        let idx = self.index(x, y);
        if self.cells[idx].treasure {
            return false;
        }
        self.cells[idx].treasure = true;
        for (nx, ny) in self.neighbors(x, y) {
            let nidx = self.index(nx, ny);
            self.cells[nidx].info += 1;
        }
        true
    }

    fn planted(&self) -> usize {
        self.cells.iter().filter(|c| c.treasure).count()
    }

    /// Draw uniformly random cells until the treasure target is met.
    /// Collisions are discarded and redrawn.
    pub fn plant_all<R: Rng>(&mut self, rng: &mut R) {
        let mut planted = self.planted();
        let mut draws = 0usize;
        while planted < self.treasures {
            let x = rng.gen_range(0..self.w);
            let y = rng.gen_range(0..self.h);
            draws += 1;
            if self.plant_treasure_at(x, y) {
                planted += 1;
            }
        }
        debug!(treasures = self.treasures, draws, "treasures planted");
    }

    /// Open the tile at (x, y).
    /// Opening an already opened tile changes nothing. Treasure tiles do not regroup.
    pub fn open(&mut self, x: usize, y: usize) -> Result<OpenOutcome> {
        self.check(x, y)?;
        let idx = self.index(x, y);
        if self.cells[idx].opened {
            return Ok(OpenOutcome::AlreadyOpen);
        }
        self.cells[idx].opened = true;
        if self.cells[idx].treasure {
            return Ok(OpenOutcome::Treasure);
        }
        self.regroup(x, y);
        Ok(OpenOutcome::Safe(self.cells[idx].info))
    }

    // Shift every id left one bit, then set the low bit on the neighbors of (x, y).
    // Cells opened through the same sequence of reveals end up sharing an id.
    fn regroup(&mut self, x: usize, y: usize) {
        for cell in self.cells.iter_mut() {
            cell.group *= 2;
        }
        for (nx, ny) in self.neighbors(x, y) {
            let nidx = self.index(nx, ny);
            self.cells[nidx].group += 1;
        }
    }

    pub fn found_treasures(&self) -> usize {
        self.cells.iter().filter(|c| c.opened && c.treasure).count()
    }

    pub fn opened_count(&self) -> usize {
        self.cells.iter().filter(|c| c.opened).count()
    }

    pub fn hidden_count(&self) -> usize {
        self.cells.len() - self.opened_count()
    }

    /// All treasures have been dug up
    pub fn is_cleared(&self) -> bool {
        self.found_treasures() == self.treasures
    }

    /// Every tile is open
    pub fn is_finished(&self) -> bool {
        self.cells.iter().all(|c| c.opened)
    }
}
