//! Turns the current percept into facts for the knowledge base.

use crate::{
    grid::{Cell, Orientation},
    kb::{Fact, KnowledgeBase},
    percept::Percept,
};

/// What the agent did on the previous tick, as far as inference cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LastMove {
    None,
    /// Tried to move forward from `from` while facing `facing`.
    Forward { from: Cell, facing: Orientation },
    /// Shot an arrow from `from` towards `facing`.
    Shot { from: Cell, facing: Orientation },
}

/// Builds the facts entailed by perceiving `p` while standing on `pos`.
pub fn create_facts(pos: Cell, p: &Percept, last: LastMove) -> Vec<Fact> {
    let mut facts = vec![Fact::Visited(pos)];

    if let (true, LastMove::Forward { from, facing }) = (p.bump, last) {
        facts.push(Fact::Wall { from, facing });
    }

    // no breeze: no neighbour holds a pit
    if !p.breeze {
        facts.extend(pos.neighbors().map(Fact::PitSafe));
    }
    // no stench: no neighbour holds the Wumpus
    if !p.stench {
        facts.extend(pos.neighbors().map(Fact::WumpusSafe));
    } else {
        facts.push(Fact::Stench(pos));
    }

    if p.scream {
        facts.push(Fact::WumpusKilled);
    } else if let LastMove::Shot { from, facing } = last {
        facts.push(Fact::ArrowMissed { from, facing });
    }

    facts
}

/// Applies the percept to the knowledge base.
pub fn infer(kb: &mut KnowledgeBase, pos: Cell, p: &Percept, last: LastMove) {
    let facts = create_facts(pos, p, last);
    tracing::trace!(%pos, percept = %p, facts = facts.len(), "tell");
    kb.tell(&facts);
    debug_assert!(kb.consistency());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kb::Bounds;

    fn c(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }

    #[test]
    fn clear_origin_makes_neighbours_safe() {
        let mut kb = KnowledgeBase::default();
        infer(&mut kb, c(0, 0), &Percept::default(), LastMove::None);
        assert!(kb.is_safe(c(1, 0)));
        assert!(kb.is_safe(c(0, 1)));
        assert!(kb.is_safe(c(0, 0)));
        assert!(kb.is_visited(c(0, 0)));
    }

    #[test]
    fn rules_are_independent() {
        let mut kb = KnowledgeBase::default();
        let breeze = Percept {
            breeze: true,
            ..Default::default()
        };
        infer(&mut kb, c(1, 1), &breeze, LastMove::None);
        assert!(kb.is_wumpus_safe(c(2, 1)));
        assert!(!kb.is_pit_safe(c(2, 1)));

        let stench = Percept {
            stench: true,
            ..Default::default()
        };
        infer(&mut kb, c(5, 5), &stench, LastMove::None);
        assert!(kb.is_pit_safe(c(5, 6)));
        assert!(!kb.is_wumpus_safe(c(5, 6)));
        assert!(kb.stench_cells().contains(&c(5, 5)));
    }

    #[test]
    fn percepts_never_retract() {
        let mut kb = KnowledgeBase::default();
        infer(&mut kb, c(0, 0), &Percept::default(), LastMove::None);
        let before: Vec<_> = kb.safe_cells().collect();
        let everything = Percept {
            breeze: true,
            stench: true,
            ..Default::default()
        };
        infer(&mut kb, c(1, 0), &everything, LastMove::None);
        for cell in before {
            assert!(kb.is_safe(cell));
        }
    }

    #[test]
    fn scream_and_missed_shot() {
        let mut kb = KnowledgeBase::new(Bounds::sized(3, 3));
        let stench = Percept {
            stench: true,
            ..Default::default()
        };
        infer(&mut kb, c(0, 0), &stench, LastMove::None);
        assert!(!kb.is_safe(c(1, 0)));

        let shot = LastMove::Shot {
            from: c(0, 0),
            facing: Orientation::East,
        };
        let facts = create_facts(c(0, 0), &stench, shot);
        assert!(facts.contains(&Fact::ArrowMissed {
            from: c(0, 0),
            facing: Orientation::East
        }));

        let scream = Percept {
            scream: true,
            ..Default::default()
        };
        let facts = create_facts(c(0, 0), &scream, shot);
        assert!(facts.contains(&Fact::WumpusKilled));
        assert!(!facts.iter().any(|f| matches!(f, Fact::ArrowMissed { .. })));
    }

    #[test]
    fn bump_after_forward_is_a_wall() {
        let bump = Percept {
            bump: true,
            ..Default::default()
        };
        let last = LastMove::Forward {
            from: c(3, 0),
            facing: Orientation::East,
        };
        let facts = create_facts(c(3, 0), &bump, last);
        assert_eq!(
            facts[1],
            Fact::Wall {
                from: c(3, 0),
                facing: Orientation::East
            }
        );
    }
}
