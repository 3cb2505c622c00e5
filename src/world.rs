//! A small seeded Wumpus world used to drive the agent end to end.

use std::collections::BTreeSet;
use std::fmt;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    config::WorldConfig,
    error::{WorldError, WorldResult},
    grid::{Cell, Orientation},
    hero::{HOME, Hero},
    percept::{Action, Percept},
};

pub const STEP_REWARD: i32 = -1;
pub const SHOOT_REWARD: i32 = -10;
pub const DEATH_REWARD: i32 = -1000;
pub const GOLD_REWARD: i32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Death {
    Pit,
    Wumpus,
}

/// Result of one [`World::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub percept: Percept,
    pub reward: i32,
    pub done: bool,
}

pub struct World {
    width: i32,
    height: i32,
    pit_probability: f64,
    rng: StdRng,
    pits: BTreeSet<Cell>,
    wumpus: Option<Cell>,
    wumpus_alive: bool,
    gold: Option<Cell>,
    hero_pos: Cell,
    hero_dir: Orientation,
    has_gold: bool,
    arrow: bool,
    alive: Option<Death>,
    exited: bool,
    bump: bool,
    scream: bool,
    score: i64,
    steps: usize,
}

impl World {
    pub fn new(config: &WorldConfig) -> WorldResult<Self> {
        if config.width < 1 || config.height < 1 || config.width * config.height < 2 {
            return Err(WorldError::Dimensions {
                width: config.width,
                height: config.height,
            });
        }
        if !(0.0..=1.0).contains(&config.pit_probability) {
            return Err(WorldError::PitProbability {
                value: config.pit_probability,
            });
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut world = Self::empty(config.width, config.height, config.pit_probability, rng);
        world.generate();
        Ok(world)
    }

    /// A world with a fixed layout.
    pub fn from_layout(
        width: i32,
        height: i32,
        pits: impl IntoIterator<Item = Cell>,
        wumpus: Option<Cell>,
        gold: Option<Cell>,
    ) -> WorldResult<Self> {
        if width < 1 || height < 1 {
            return Err(WorldError::Dimensions { width, height });
        }
        let mut world = Self::empty(width, height, 0.0, StdRng::seed_from_u64(0));
        world.pits = pits.into_iter().collect();
        world.wumpus = wumpus;
        world.gold = gold;
        Ok(world)
    }

    fn empty(width: i32, height: i32, pit_probability: f64, rng: StdRng) -> Self {
        Self {
            width,
            height,
            pit_probability,
            rng,
            pits: BTreeSet::new(),
            wumpus: None,
            wumpus_alive: true,
            gold: None,
            hero_pos: HOME,
            hero_dir: Orientation::East,
            has_gold: false,
            arrow: true,
            alive: None,
            exited: false,
            bump: false,
            scream: false,
            score: 0,
            steps: 0,
        }
    }

    fn generate(&mut self) {
        let cells: Vec<Cell> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Cell::new(x, y)))
            .filter(|c| *c != HOME)
            .collect();

        for cell in &cells {
            if self.rng.random_bool(self.pit_probability) {
                self.pits.insert(*cell);
            }
        }

        let free: Vec<Cell> = cells
            .iter()
            .copied()
            .filter(|c| !self.pits.contains(c))
            .collect();
        if free.is_empty() {
            return;
        }
        let wumpus = free[self.rng.random_range(0..free.len())];
        self.wumpus = Some(wumpus);

        let free: Vec<Cell> = free.into_iter().filter(|c| *c != wumpus).collect();
        if !free.is_empty() {
            self.gold = Some(free[self.rng.random_range(0..free.len())]);
        }
    }

    /// Generates a new layout from the same random stream.
    pub fn reset(&mut self) {
        let rng = self.rng.clone();
        *self = Self::empty(self.width, self.height, self.pit_probability, rng);
        self.generate();
    }

    fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn adjacent(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors().into_iter().filter(move |c| self.contains(*c))
    }

    pub fn is_pit(&self, cell: Cell) -> bool {
        self.pits.contains(&cell)
    }

    pub fn is_live_wumpus(&self, cell: Cell) -> bool {
        self.wumpus_alive && self.wumpus == Some(cell)
    }

    pub fn hero_pos(&self) -> Cell {
        self.hero_pos
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.alive.is_some() || self.exited
    }

    /// Percepts at the hero's position. Bump and scream are reported once.
    pub fn percept(&mut self) -> Percept {
        let here = self.hero_pos;
        let p = Percept {
            breeze: self.adjacent(here).any(|c| self.is_pit(c)),
            stench: self.adjacent(here).any(|c| self.is_live_wumpus(c)),
            glitter: self.gold == Some(here) && !self.has_gold,
            bump: self.bump,
            scream: self.scream,
        };
        self.bump = false;
        self.scream = false;
        p
    }

    pub fn step(&mut self, action: Action) -> WorldResult<StepOutcome> {
        if self.is_over() {
            return Err(WorldError::Finished);
        }
        self.steps += 1;
        let mut reward = STEP_REWARD;

        match action {
            Action::Forward => {
                let next = self.hero_pos.step(self.hero_dir);
                if self.contains(next) {
                    self.hero_pos = next;
                } else {
                    self.bump = true;
                }
            }
            Action::Left => self.hero_dir = self.hero_dir.left(),
            Action::Right => self.hero_dir = self.hero_dir.right(),
            Action::Grab => {
                if self.gold == Some(self.hero_pos) && !self.has_gold {
                    self.has_gold = true;
                    self.gold = None;
                }
            }
            Action::Shoot => {
                reward = SHOOT_REWARD;
                self.shoot();
            }
            Action::Climb => {
                if self.hero_pos == HOME {
                    self.exited = true;
                }
            }
        }

        if self.is_pit(self.hero_pos) {
            self.alive = Some(Death::Pit);
            reward += DEATH_REWARD;
        } else if self.is_live_wumpus(self.hero_pos) {
            self.alive = Some(Death::Wumpus);
            reward += DEATH_REWARD;
        }
        if self.exited && self.has_gold {
            reward += GOLD_REWARD;
        }

        self.score += i64::from(reward);
        Ok(StepOutcome {
            percept: self.percept(),
            reward,
            done: self.is_over(),
        })
    }

    fn shoot(&mut self) {
        if !self.arrow {
            return;
        }
        self.arrow = false;
        let mut cell = self.hero_pos.step(self.hero_dir);
        while self.contains(cell) {
            if self.is_live_wumpus(cell) {
                self.wumpus_alive = false;
                self.scream = true;
                return;
            }
            cell = cell.step(self.hero_dir);
        }
    }

    pub fn report(&self) -> EpisodeReport {
        EpisodeReport {
            score: self.score,
            steps: self.steps,
            death: self.alive,
            has_gold: self.has_gold,
            exited: self.exited,
        }
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = Cell::new(x, y);
                if cell == self.hero_pos {
                    write!(f, "x ")?;
                } else if self.is_pit(cell) {
                    write!(f, "o ")?;
                } else if self.wumpus == Some(cell) {
                    write!(f, "{} ", if self.wumpus_alive { 'w' } else { '+' })?;
                } else if self.gold == Some(cell) {
                    write!(f, "g ")?;
                } else {
                    write!(f, ". ")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "facing: {}  arrow: {}  gold: {}  score: {}",
            self.hero_dir, self.arrow, self.has_gold, self.score
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpisodeReport {
    pub score: i64,
    pub steps: usize,
    pub death: Option<Death>,
    pub has_gold: bool,
    pub exited: bool,
}

impl EpisodeReport {
    pub fn won(&self) -> bool {
        self.exited && self.has_gold
    }

    pub fn alive(&self) -> bool {
        self.death.is_none()
    }
}

/// Plays one episode of `hero` in `world`, for at most `max_steps` actions.
///
/// `on_step` sees the world after every action.
pub fn run_episode(
    hero: &mut Hero,
    world: &mut World,
    max_steps: usize,
    mut on_step: impl FnMut(Action, &World),
) -> WorldResult<EpisodeReport> {
    hero.new_episode();
    let mut percept = world.percept();
    let mut reward = 0;

    for _ in 0..max_steps {
        let action = hero.get_action(percept, reward)?;
        let outcome = world.step(action)?;
        on_step(action, world);
        if outcome.done {
            break;
        }
        percept = outcome.percept;
        reward = outcome.reward;
    }

    let report = world.report();
    tracing::debug!(?report, "episode finished");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }

    #[test]
    fn percepts_reflect_neighbours() {
        let mut world =
            World::from_layout(4, 4, [c(2, 0)], Some(c(0, 1)), Some(c(1, 0))).unwrap();
        let p = world.percept();
        assert!(p.stench);
        assert!(!p.breeze);
        world.step(Action::Forward).unwrap();
        let p = world.percept();
        assert!(p.breeze);
        assert!(p.glitter);
    }

    #[test]
    fn bump_at_the_edge() {
        let mut world = World::from_layout(2, 2, [], None, None).unwrap();
        world.step(Action::Left).unwrap();
        let outcome = world.step(Action::Forward).unwrap();
        assert!(outcome.percept.bump);
        assert_eq!(world.hero_pos(), HOME);
        assert!(!world.percept().bump);
    }

    #[test]
    fn arrow_kills_in_line() {
        let mut world = World::from_layout(4, 1, [], Some(c(3, 0)), None).unwrap();
        let outcome = world.step(Action::Shoot).unwrap();
        assert!(outcome.percept.scream);
        assert_eq!(outcome.reward, SHOOT_REWARD);
        assert!(!world.is_live_wumpus(c(3, 0)));
        // only one arrow
        let outcome = world.step(Action::Shoot).unwrap();
        assert!(!outcome.percept.scream);
    }

    #[test]
    fn falling_into_a_pit_ends_the_episode() {
        let mut world = World::from_layout(2, 1, [c(1, 0)], None, None).unwrap();
        let outcome = world.step(Action::Forward).unwrap();
        assert!(outcome.done);
        assert_eq!(outcome.reward, STEP_REWARD + DEATH_REWARD);
        assert_eq!(world.report().death, Some(Death::Pit));
        assert!(matches!(
            world.step(Action::Climb),
            Err(WorldError::Finished)
        ));
    }

    #[test]
    fn escaping_with_gold_scores() {
        let mut world = World::from_layout(2, 1, [], None, Some(HOME)).unwrap();
        world.step(Action::Grab).unwrap();
        let outcome = world.step(Action::Climb).unwrap();
        assert!(outcome.done);
        assert_eq!(outcome.reward, STEP_REWARD + GOLD_REWARD);
        assert!(world.report().won());
    }

    #[test]
    fn seeded_worlds_repeat() {
        let config = WorldConfig {
            width: 5,
            height: 5,
            pit_probability: 0.2,
            seed: Some(42),
        };
        let a = World::new(&config).unwrap();
        let b = World::new(&config).unwrap();
        assert_eq!(a.pits, b.pits);
        assert_eq!(a.wumpus, b.wumpus);
        assert_eq!(a.gold, b.gold);
        assert!(!a.pits.contains(&HOME));
        assert_ne!(a.wumpus, Some(HOME));
    }

    #[test]
    fn rejects_bad_config() {
        let config = WorldConfig {
            width: 1,
            height: 1,
            ..Default::default()
        };
        assert!(matches!(
            World::new(&config),
            Err(WorldError::Dimensions { .. })
        ));
        let config = WorldConfig {
            pit_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            World::new(&config),
            Err(WorldError::PitProbability { .. })
        ));
    }

    #[test]
    fn agent_wins_an_open_world() {
        let mut world = World::from_layout(3, 3, [], Some(c(2, 2)), Some(c(2, 0))).unwrap();
        let mut hero = Hero::new(crate::config::AgentConfig {
            grid_size: Some((3, 3)),
        });
        let report = run_episode(&mut hero, &mut world, 100, |_, _| {}).unwrap();
        assert!(report.won());
        assert!(report.alive());
    }
}
