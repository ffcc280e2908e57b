//! Tile arena: cell kinds plus the obstacle list used for vehicle collision
//!
//! The cell array answers point queries (projectiles, spawn validation); the
//! obstacle list is what vehicles iterate when resolving collisions. Both are
//! only mutated together.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::Tuning;

/// Contents of one arena cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    Destructible,
    /// Returned for lookups outside the arena
    OutOfBounds,
}

impl CellKind {
    /// Blocks projectiles and vehicles
    pub fn is_solid(self) -> bool {
        matches!(self, CellKind::Wall | CellKind::Destructible)
    }
}

/// A non-empty cell, mirrored from the grid for iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub cell_x: u32,
    pub cell_y: u32,
    pub kind: CellKind,
}

impl Obstacle {
    /// Top-left corner in arena units
    pub fn origin(&self, cell_size: f32) -> Vec2 {
        Vec2::new(self.cell_x as f32 * cell_size, self.cell_y as f32 * cell_size)
    }

    /// Cell center in arena units
    pub fn center(&self, cell_size: f32) -> Vec2 {
        self.origin(cell_size) + Vec2::splat(cell_size / 2.0)
    }
}

/// Fixed-size tile map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaGrid {
    width: u32,
    height: u32,
    cell_size: f32,
    /// Row-major cell kinds
    cells: Vec<CellKind>,
    obstacles: Vec<Obstacle>,
}

impl ArenaGrid {
    /// An arena with only the border ring walled in
    pub fn walled(width: u32, height: u32, cell_size: f32) -> Self {
        let mut grid = Self {
            width,
            height,
            cell_size,
            cells: vec![CellKind::Empty; (width * height) as usize],
            obstacles: Vec::new(),
        };

        for x in 0..width {
            grid.place(x, 0, CellKind::Wall);
            grid.place(x, height - 1, CellKind::Wall);
        }
        for y in 0..height {
            grid.place(0, y, CellKind::Wall);
            grid.place(width - 1, y, CellKind::Wall);
        }
        grid
    }

    /// Build a fresh arena: border walls plus randomly scattered obstacles.
    ///
    /// Makes exactly `obstacle_attempts` placement attempts. Attempts that land
    /// near the arena center are dropped rather than retried, so the number of
    /// interior obstacles varies from arena to arena.
    pub fn generate(tuning: &Tuning, rng: &mut impl RandomSource) -> Self {
        let mut grid = Self::walled(tuning.map_width, tuning.map_height, tuning.grid_size);
        let center = tuning.arena_center();

        for _ in 0..tuning.obstacle_attempts {
            let x = rng.index(2, tuning.map_width - 2);
            let y = rng.index(2, tuning.map_height - 2);

            let corner = Vec2::new(x as f32, y as f32) * tuning.grid_size;
            if corner.distance(center) < tuning.spawn_clearance {
                continue;
            }

            let kind = if rng.chance(tuning.wall_chance) {
                CellKind::Wall
            } else {
                CellKind::Destructible
            };
            grid.place(x, y, kind);
        }

        log::info!(
            "Generated {}x{} arena with {} interior obstacles",
            grid.width,
            grid.height,
            grid.interior_obstacle_count()
        );
        grid
    }

    /// Set a cell and keep the obstacle list in step.
    ///
    /// Re-placing an occupied cell rewrites its existing record instead of
    /// adding a second one.
    pub fn place(&mut self, cell_x: u32, cell_y: u32, kind: CellKind) {
        let Some(idx) = self.index(cell_x as i32, cell_y as i32) else {
            return;
        };
        self.cells[idx] = kind;

        let record = self
            .obstacles
            .iter()
            .position(|o| o.cell_x == cell_x && o.cell_y == cell_y);
        match (kind.is_solid(), record) {
            (true, Some(i)) => self.obstacles[i].kind = kind,
            (true, None) => self.obstacles.push(Obstacle { cell_x, cell_y, kind }),
            (false, Some(i)) => {
                self.obstacles.remove(i);
            }
            (false, None) => {}
        }
    }

    fn index(&self, cell_x: i32, cell_y: i32) -> Option<usize> {
        if cell_x < 0 || cell_y < 0 || cell_x >= self.width as i32 || cell_y >= self.height as i32 {
            return None;
        }
        Some(cell_y as usize * self.width as usize + cell_x as usize)
    }

    /// Kind of the cell at the given coordinates, `OutOfBounds` outside the map
    pub fn cell_at(&self, cell_x: i32, cell_y: i32) -> CellKind {
        self.index(cell_x, cell_y)
            .map(|i| self.cells[i])
            .unwrap_or(CellKind::OutOfBounds)
    }

    /// Cell coordinates containing an arena-space point
    pub fn cell_of(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    /// Kind of the cell containing an arena-space point
    pub fn cell_at_point(&self, point: Vec2) -> CellKind {
        let (x, y) = self.cell_of(point);
        self.cell_at(x, y)
    }

    /// Knock out a destructible cell.
    ///
    /// Returns `false` (and changes nothing) unless the cell was destructible.
    pub fn destroy(&mut self, cell_x: i32, cell_y: i32) -> bool {
        let Some(idx) = self.index(cell_x, cell_y) else {
            return false;
        };
        if self.cells[idx] != CellKind::Destructible {
            return false;
        }
        self.cells[idx] = CellKind::Empty;

        let record = self
            .obstacles
            .iter()
            .position(|o| o.cell_x as i32 == cell_x && o.cell_y as i32 == cell_y);
        match record {
            Some(i) => {
                self.obstacles.remove(i);
            }
            None => log::warn!("No obstacle record for destroyed cell ({cell_x}, {cell_y})"),
        }
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Obstacles in placement order
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Non-empty cells away from the border ring
    pub fn interior_obstacle_count(&self) -> usize {
        self.obstacles
            .iter()
            .filter(|o| !self.is_border(o.cell_x, o.cell_y))
            .count()
    }

    pub fn is_border(&self, cell_x: u32, cell_y: u32) -> bool {
        cell_x == 0 || cell_y == 0 || cell_x == self.width - 1 || cell_y == self.height - 1
    }

    /// Every non-empty cell has exactly one record of matching kind, and
    /// every record points at a non-empty cell.
    pub fn is_consistent(&self) -> bool {
        let solid_cells = self.cells.iter().filter(|c| c.is_solid()).count();
        if solid_cells != self.obstacles.len() {
            return false;
        }
        self.obstacles.iter().enumerate().all(|(i, o)| {
            self.cell_at(o.cell_x as i32, o.cell_y as i32) == o.kind
                && !self.obstacles[..i]
                    .iter()
                    .any(|p| p.cell_x == o.cell_x && p.cell_y == o.cell_y)
        })
    }
}
