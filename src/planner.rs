//! Breadth-first route planning through cells already proven safe.

use std::collections::{BTreeMap, VecDeque};

use crate::{
    error::{AgentError, AgentResult},
    grid::{Cell, Orientation, turn_cost},
    kb::KnowledgeBase,
    percept::Action,
};

/// A planned route: the cells walked through and the actions that walk them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Cells from start to goal, both included.
    pub path: Vec<Cell>,
    pub actions: Vec<Action>,
    /// Orientation once every action has been taken.
    pub facing: Orientation,
}

impl Route {
    pub fn forward_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| **a == Action::Forward)
            .count()
    }

    pub fn turn_count(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, Action::Left | Action::Right))
            .count()
    }
}

/// Shortest rotation from `from` to `to`. A reversal is always two rights.
pub fn rotation(from: Orientation, to: Orientation) -> Vec<Action> {
    match turn_cost(from, to) {
        0 => vec![],
        2 => vec![Action::Right, Action::Right],
        _ if from.right() == to => vec![Action::Right],
        _ => vec![Action::Left],
    }
}

/// BFS over in-bounds safe cells plus `start`, neighbours visited N, E, S, W.
///
/// Returns each reached cell with its predecessor (`None` for `start`).
pub fn search(kb: &KnowledgeBase, start: Cell) -> BTreeMap<Cell, Option<Cell>> {
    let mut parents = BTreeMap::new();
    let mut queue = VecDeque::new();
    parents.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for next in current.neighbors() {
            if parents.contains_key(&next) || !kb.in_bounds(next) || !kb.is_safe(next) {
                continue;
            }
            parents.insert(next, Some(current));
            queue.push_back(next);
        }
    }
    parents
}

/// Plans the fewest-steps route from `start` to `goal` through safe cells.
pub fn plan(
    kb: &KnowledgeBase,
    start: Cell,
    facing: Orientation,
    goal: Cell,
) -> AgentResult<Route> {
    let parents = search(kb, start);
    if !parents.contains_key(&goal) {
        return Err(AgentError::NoPath {
            from: start,
            to: goal,
        });
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(Some(prev)) = parents.get(&cursor) {
        path.push(*prev);
        cursor = *prev;
    }
    path.reverse();

    let mut actions = Vec::new();
    let mut current = facing;
    for pair in path.windows(2) {
        let needed = Orientation::towards(pair[0], pair[1]).ok_or(AgentError::NoPath {
            from: pair[0],
            to: pair[1],
        })?;
        actions.extend(rotation(current, needed));
        actions.push(Action::Forward);
        current = needed;
    }

    Ok(Route {
        path,
        actions,
        facing: current,
    })
}
