use std::collections::VecDeque;

use crate::{
    config::AgentConfig,
    error::{AgentError, AgentResult},
    frontier::select_target,
    grid::{Cell, Orientation},
    inference::{LastMove, infer},
    kb::KnowledgeBase,
    percept::{Action, Percept},
    planner::{plan, rotation, search},
};

/// Where every episode starts, facing east.
pub const HOME: Cell = Cell::new(0, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Explore,
    /// Gold in hand (or being grabbed), heading home.
    Retrieve,
    /// No safe frontier left; trying to shoot the Wumpus.
    Hunt,
    /// Nothing more to gain; heading home to climb out.
    Retreat,
    Done,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentState {
    pub pos: Cell,
    pub facing: Orientation,
    pub home: Cell,
    pub has_goal: bool,
    pub mode: Mode,
    pub arrow_available: bool,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            pos: HOME,
            facing: Orientation::East,
            home: HOME,
            has_goal: false,
            mode: Mode::Explore,
            arrow_available: true,
        }
    }
}

/// Telemetry only; rewards never influence decisions.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpisodeStats {
    pub ticks: u64,
    pub total_reward: i64,
}

pub struct Hero {
    config: AgentConfig,
    kb: KnowledgeBase,
    state: AgentState,
    route: VecDeque<Action>,
    target: Option<Cell>,
    last: LastMove,
    stats: EpisodeStats,
}

impl Default for Hero {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl Hero {
    pub fn new(config: AgentConfig) -> Self {
        let kb = KnowledgeBase::new(config.bounds());
        Self {
            config,
            kb,
            state: AgentState::default(),
            route: VecDeque::new(),
            target: None,
            last: LastMove::None,
            stats: EpisodeStats::default(),
        }
    }

    /// Forgets everything from the previous episode.
    pub fn new_episode(&mut self) {
        *self = Self::new(self.config.clone());
    }

    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn stats(&self) -> EpisodeStats {
        self.stats
    }

    /// Consumes one percept and returns exactly one action.
    pub fn get_action(&mut self, p: Percept, reward: i32) -> AgentResult<Action> {
        if self.state.mode == Mode::Done {
            return Err(AgentError::EpisodeOver);
        }
        self.validate(&p)?;

        self.stats.ticks += 1;
        self.stats.total_reward += i64::from(reward);

        if p.bump {
            if let LastMove::Forward { from, facing } = self.last {
                tracing::warn!(at = %from, %facing, "bumped into a wall");
                self.state.pos = from;
            }
            self.forget_route();
        }
        if p.scream {
            self.forget_route();
        }

        infer(&mut self.kb, self.state.pos, &p, self.last);
        self.last = LastMove::None;

        let action = self.decide(&p)?;
        tracing::debug!(
            tick = self.stats.ticks,
            pos = %self.state.pos,
            facing = %self.state.facing,
            percept = %p,
            mode = ?self.state.mode,
            %action,
            "decided"
        );
        self.apply(action);
        Ok(action)
    }

    fn validate(&self, p: &Percept) -> AgentResult<()> {
        if p.bump && !matches!(self.last, LastMove::Forward { .. }) {
            return Err(AgentError::InvalidPercept {
                reason: "bump without a preceding FORWARD".into(),
            });
        }
        if p.scream && !matches!(self.last, LastMove::Shot { .. }) {
            return Err(AgentError::InvalidPercept {
                reason: "scream without a preceding SHOOT".into(),
            });
        }
        Ok(())
    }

    fn decide(&mut self, p: &Percept) -> AgentResult<Action> {
        if p.glitter && !self.state.has_goal {
            self.state.has_goal = true;
            self.set_mode(Mode::Retrieve);
            self.forget_route();
            tracing::info!(at = %self.state.pos, "grabbing the gold");
            return Ok(Action::Grab);
        }

        if self.state.has_goal {
            return self.head_home();
        }

        if let Some(action) = self.route.pop_front() {
            return Ok(action);
        }

        if let Some(target) = select_target(&self.kb, self.state.pos) {
            self.set_mode(Mode::Explore);
            return self.follow(target);
        }

        if let Some((vantage, aim)) = self.hunt_position() {
            self.set_mode(Mode::Hunt);
            let route = plan(&self.kb, self.state.pos, self.state.facing, vantage)?;
            tracing::info!(%vantage, %aim, "hunting the wumpus");
            self.route = route.actions.into();
            self.route.extend(rotation(route.facing, aim));
            self.route.push_back(Action::Shoot);
            self.target = Some(vantage);
            return self.next_in_route(vantage);
        }

        self.set_mode(Mode::Retreat);
        self.head_home()
    }

    fn head_home(&mut self) -> AgentResult<Action> {
        if self.state.pos == self.state.home {
            self.set_mode(Mode::Done);
            tracing::info!(with_gold = self.state.has_goal, "climbing out");
            return Ok(Action::Climb);
        }
        self.follow(self.state.home)
    }

    /// Next action towards `goal`, reusing the pending route when it leads there.
    fn follow(&mut self, goal: Cell) -> AgentResult<Action> {
        if self.target != Some(goal) || self.route.is_empty() {
            let route = plan(&self.kb, self.state.pos, self.state.facing, goal)?;
            self.route = route.actions.into();
            self.target = Some(goal);
        }
        self.next_in_route(goal)
    }

    fn next_in_route(&mut self, goal: Cell) -> AgentResult<Action> {
        self.route.pop_front().ok_or(AgentError::NoPath {
            from: self.state.pos,
            to: goal,
        })
    }

    /// Nearest reachable stench cell with a neighbour that may hold the
    /// Wumpus, and the direction to shoot from it.
    fn hunt_position(&self) -> Option<(Cell, Orientation)> {
        if !self.kb.wumpus_alive() || !self.state.arrow_available {
            return None;
        }
        let reachable = search(&self.kb, self.state.pos);
        self.kb
            .stench_cells()
            .iter()
            .filter(|cell| reachable.contains_key(*cell))
            .filter_map(|&cell| {
                Orientation::ALL
                    .into_iter()
                    .find(|dir| {
                        let n = cell.step(*dir);
                        self.kb.in_bounds(n) && !self.kb.is_wumpus_safe(n)
                    })
                    .map(|dir| (cell, dir))
            })
            .min_by_key(|(cell, _)| (self.state.pos.manhattan(*cell), *cell))
    }

    /// Updates the believed pose after emitting `action`.
    fn apply(&mut self, action: Action) {
        let pos = self.state.pos;
        let facing = self.state.facing;
        match action {
            Action::Forward => {
                debug_assert!(self.kb.is_safe(pos.step(facing)));
                self.last = LastMove::Forward { from: pos, facing };
                self.state.pos = pos.step(facing);
            }
            Action::Left => self.state.facing = facing.left(),
            Action::Right => self.state.facing = facing.right(),
            Action::Grab => {}
            Action::Shoot => {
                self.state.arrow_available = false;
                self.last = LastMove::Shot { from: pos, facing };
            }
            Action::Climb => self.set_mode(Mode::Done),
        }
    }

    fn forget_route(&mut self) {
        self.route.clear();
        self.target = None;
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.state.mode != mode {
            tracing::info!(from = ?self.state.mode, to = ?mode, "mode change");
            self.state.mode = mode;
        }
    }
}
