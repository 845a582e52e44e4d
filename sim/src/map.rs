use shared::{Loc, MapFormatError, Terrain};
use std::str::FromStr;

/// Parsed island geography: a rectangular, water-enclosed grid of terrain.
#[derive(Debug, Clone, PartialEq)]
pub struct IslandMap {
    rows: usize,
    cols: usize,
    terrain: Vec<Terrain>,
}

impl IslandMap {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.terrain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty()
    }

    /// Row-major index of a 1-indexed location, if it lies on the map
    pub fn index_of(&self, loc: Loc) -> Option<usize> {
        let (row, col) = (loc.row(), loc.col());
        if row == 0 || col == 0 || row > self.rows || col > self.cols {
            return None;
        }
        Some((row - 1) * self.cols + (col - 1))
    }

    pub fn loc_of(&self, index: usize) -> Loc {
        Loc(index / self.cols + 1, index % self.cols + 1)
    }

    pub fn terrain_at(&self, loc: Loc) -> Option<Terrain> {
        self.index_of(loc).map(|i| self.terrain[i])
    }

    pub fn terrain(&self) -> &[Terrain] {
        &self.terrain
    }

    /// Indices of the passable cells north, south, west and east of `index`.
    pub fn passable_neighbours(&self, index: usize) -> Vec<usize> {
        let (row, col) = (index / self.cols, index % self.cols);
        let mut neighbours = Vec::with_capacity(4);
        if row > 0 {
            neighbours.push(index - self.cols);
        }
        if row + 1 < self.rows {
            neighbours.push(index + self.cols);
        }
        if col > 0 {
            neighbours.push(index - 1);
        }
        if col + 1 < self.cols {
            neighbours.push(index + 1);
        }
        neighbours.retain(|&i| self.terrain[i].is_passable());
        neighbours
    }
}

impl FromStr for IslandMap {
    type Err = MapFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.trim().lines().map(str::trim).collect();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        if cols == 0 {
            return Err(MapFormatError::Empty);
        }

        for (i, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(MapFormatError::RaggedRows {
                    row: i + 1,
                    expected: cols,
                    found,
                });
            }
        }

        let rows = lines.len();
        let mut terrain = Vec::with_capacity(rows * cols);
        for (r, line) in lines.iter().enumerate() {
            for (c, letter) in line.chars().enumerate() {
                let t = Terrain::from_letter(letter).ok_or(MapFormatError::UnknownTerrain {
                    letter,
                    row: r + 1,
                    col: c + 1,
                })?;
                terrain.push(t);
            }
        }

        for (i, t) in terrain.iter().enumerate() {
            let (r, c) = (i / cols, i % cols);
            let on_border = r == 0 || c == 0 || r + 1 == rows || c + 1 == cols;
            if on_border && *t != Terrain::Water {
                return Err(MapFormatError::NonWaterBorder { row: r + 1, col: c + 1 });
            }
        }

        Ok(Self {
            rows,
            cols,
            terrain,
        })
    }
}
