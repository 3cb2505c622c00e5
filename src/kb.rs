//! The agent's knowledge base.
//!
//! Only safety is tracked, never hazard positions: the absence of a breeze or
//! stench proves the neighbours safe, while their presence proves nothing on
//! its own. Every update is monotone, so a cell never leaves a safety set.

use std::collections::BTreeSet;

use crate::grid::{Cell, Orientation};

/// A single piece of knowledge told to the [`KnowledgeBase`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Fact {
    Visited(Cell),
    PitSafe(Cell),
    WumpusSafe(Cell),
    Stench(Cell),
    WumpusKilled,
    /// Moving forward from `from` while facing `facing` hit the edge of the world.
    Wall { from: Cell, facing: Orientation },
    /// An arrow shot from `from` towards `facing` produced no scream.
    ArrowMissed { from: Cell, facing: Orientation },
}

/// What is known about the extent of the world.
///
/// The origin is the top-left corner so negative coordinates are always off
/// the grid; width and height become known through bumps or configuration.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl Bounds {
    pub fn sized(width: i32, height: i32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && self.width.is_none_or(|w| cell.x < w)
            && self.height.is_none_or(|h| cell.y < h)
    }
}

#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    visited: BTreeSet<Cell>,
    pit_safe: BTreeSet<Cell>,
    wumpus_safe: BTreeSet<Cell>,
    stench_cells: BTreeSet<Cell>,
    wumpus_alive: bool,
    bounds: Bounds,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new(Bounds::default())
    }
}

impl KnowledgeBase {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            visited: BTreeSet::new(),
            pit_safe: BTreeSet::new(),
            wumpus_safe: BTreeSet::new(),
            stench_cells: BTreeSet::new(),
            wumpus_alive: true,
            bounds,
        }
    }

    pub fn tell(&mut self, facts: &[Fact]) {
        for fact in facts {
            match *fact {
                Fact::Visited(cell) => self.mark_visited(cell),
                Fact::PitSafe(cell) => self.mark_pit_safe([cell]),
                Fact::WumpusSafe(cell) => self.mark_wumpus_safe([cell]),
                Fact::Stench(cell) => {
                    self.stench_cells.insert(cell);
                }
                Fact::WumpusKilled => self.on_wumpus_killed(),
                Fact::Wall { from, facing } => self.learn_wall(from, facing),
                Fact::ArrowMissed { from, facing } => self.on_arrow_missed(from, facing),
            }
        }
    }

    pub fn mark_visited(&mut self, cell: Cell) {
        self.visited.insert(cell);
        self.pit_safe.insert(cell);
        self.wumpus_safe.insert(cell);
    }

    pub fn mark_pit_safe(&mut self, cells: impl IntoIterator<Item = Cell>) {
        for cell in cells {
            self.pit_safe.insert(cell);
            // with the Wumpus dead, pit safety is full safety
            if !self.wumpus_alive {
                self.wumpus_safe.insert(cell);
            }
        }
    }

    pub fn mark_wumpus_safe(&mut self, cells: impl IntoIterator<Item = Cell>) {
        self.wumpus_safe.extend(cells);
    }

    /// Promotes every pit-safe cell to safe. Idempotent.
    pub fn on_wumpus_killed(&mut self) {
        if self.wumpus_alive {
            tracing::info!("wumpus killed, pit-safe cells are now safe");
        }
        self.wumpus_alive = false;
        self.wumpus_safe.extend(self.pit_safe.iter().copied());
    }

    /// Every cell on the arrow's line of flight is free of a live Wumpus.
    ///
    /// The line is walked while it stays inside the known bounds and inside
    /// the bounding box of the cells known so far.
    pub fn on_arrow_missed(&mut self, from: Cell, facing: Orientation) {
        let Some((max_x, max_y)) = self.known_extent() else {
            return;
        };
        let mut cell = from.step(facing);
        while self.bounds.contains(cell) && cell.x <= max_x && cell.y <= max_y {
            self.wumpus_safe.insert(cell);
            cell = cell.step(facing);
        }
    }

    /// Records the edge learned by bumping while moving from `from`.
    pub fn learn_wall(&mut self, from: Cell, facing: Orientation) {
        match facing {
            Orientation::East => self.bounds.width = Some(from.x + 1),
            Orientation::South => self.bounds.height = Some(from.y + 1),
            Orientation::North | Orientation::West => {
                if self.bounds.contains(from.step(facing)) {
                    tracing::warn!(%from, %facing, "bump against an edge that should not exist");
                }
            }
        }
    }

    fn known_extent(&self) -> Option<(i32, i32)> {
        let cells = self.pit_safe.iter().chain(self.wumpus_safe.iter());
        cells.fold(None, |acc, c| match acc {
            None => Some((c.x, c.y)),
            Some((x, y)) => Some((x.max(c.x), y.max(c.y))),
        })
    }

    pub fn is_safe(&self, cell: Cell) -> bool {
        self.pit_safe.contains(&cell) && self.wumpus_safe.contains(&cell)
    }

    pub fn is_visited(&self, cell: Cell) -> bool {
        self.visited.contains(&cell)
    }

    pub fn is_pit_safe(&self, cell: Cell) -> bool {
        self.pit_safe.contains(&cell)
    }

    pub fn is_wumpus_safe(&self, cell: Cell) -> bool {
        self.wumpus_safe.contains(&cell)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.bounds.contains(cell)
    }

    /// The derived safe set, `pit_safe ∩ wumpus_safe`, in coordinate order.
    pub fn safe_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.pit_safe
            .iter()
            .copied()
            .filter(|c| self.wumpus_safe.contains(c))
    }

    pub fn visited(&self) -> &BTreeSet<Cell> {
        &self.visited
    }

    pub fn pit_safe(&self) -> &BTreeSet<Cell> {
        &self.pit_safe
    }

    pub fn wumpus_safe(&self) -> &BTreeSet<Cell> {
        &self.wumpus_safe
    }

    pub fn stench_cells(&self) -> &BTreeSet<Cell> {
        &self.stench_cells
    }

    pub fn wumpus_alive(&self) -> bool {
        self.wumpus_alive
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// True when every visited cell is safe.
    pub fn consistency(&self) -> bool {
        self.visited.iter().all(|c| self.is_safe(*c))
    }
}
