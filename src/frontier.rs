//! Picks the next cell to explore.

use crate::{grid::Cell, kb::KnowledgeBase, planner::search};

/// Nearest safe, unvisited cell reachable from `current` through safe cells.
///
/// Distance is Manhattan distance from `current`; ties go to the smallest
/// `(x, y)`.
pub fn select_target(kb: &KnowledgeBase, current: Cell) -> Option<Cell> {
    search(kb, current)
        .into_keys()
        .filter(|cell| !kb.is_visited(*cell) && kb.is_safe(*cell))
        .min_by_key(|cell| (current.manhattan(*cell), *cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kb::Bounds;

    fn c(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }

    fn safe(kb: &mut KnowledgeBase, cells: &[(i32, i32)]) {
        let cells: Vec<Cell> = cells.iter().map(|&(x, y)| c(x, y)).collect();
        kb.mark_pit_safe(cells.iter().copied());
        kb.mark_wumpus_safe(cells);
    }

    #[test]
    fn nearest_with_lexicographic_ties() {
        let mut kb = KnowledgeBase::new(Bounds::sized(4, 4));
        kb.mark_visited(c(0, 0));
        safe(&mut kb, &[(1, 0), (0, 1), (2, 0)]);
        // (0,1) and (1,0) are both one step away
        assert_eq!(select_target(&kb, c(0, 0)), Some(c(0, 1)));
    }

    #[test]
    fn skips_visited_and_unreachable() {
        let mut kb = KnowledgeBase::new(Bounds::sized(4, 4));
        kb.mark_visited(c(0, 0));
        kb.mark_visited(c(1, 0));
        // (3,0) is safe but (2,0) is not, so it cannot be reached
        safe(&mut kb, &[(3, 0)]);
        assert_eq!(select_target(&kb, c(1, 0)), None);
        safe(&mut kb, &[(2, 0)]);
        assert_eq!(select_target(&kb, c(1, 0)), Some(c(2, 0)));
    }

    #[test]
    fn ignores_cells_off_the_grid() {
        let mut kb = KnowledgeBase::new(Bounds::sized(1, 1));
        kb.mark_visited(c(0, 0));
        safe(&mut kb, &[(1, 0), (0, 1), (-1, 0), (0, -1)]);
        assert_eq!(select_target(&kb, c(0, 0)), None);
    }

    #[test]
    fn pit_safe_only_is_not_a_target() {
        let mut kb = KnowledgeBase::default();
        kb.mark_visited(c(0, 0));
        kb.mark_pit_safe([c(1, 0)]);
        assert_eq!(select_target(&kb, c(0, 0)), None);
    }
}
