//! # wumpus
//!
//! A logical agent for the Wumpus world. It explores a grid it cannot see,
//! proving cells safe from local percepts, and only ever steps onto cells
//! whose safety has been established.
//!
//! - **Grid** (`grid`): cells, orientations, turn costs
//! - **Knowledge base** (`kb`): pit-safe / wumpus-safe sets, the derived safe set
//! - **Inference** (`inference`): no breeze ⇒ neighbours pit-safe, no stench ⇒ neighbours wumpus-safe
//! - **Planning** (`planner`, `frontier`): BFS routes with turn costs, Manhattan-nearest frontier
//! - **Hero** (`hero`): the per-tick decision state machine
//! - **World** (`world`): a seeded simulator to run episodes against
//!
//! ```no_run
//! use wumpus::config::{AgentConfig, WorldConfig};
//! use wumpus::hero::Hero;
//! use wumpus::world::{World, run_episode};
//!
//! let mut world = World::new(&WorldConfig::default()).unwrap();
//! let mut hero = Hero::new(AgentConfig::default());
//! let report = run_episode(&mut hero, &mut world, 100, |_, _| {}).unwrap();
//! println!("won: {}", report.won());
//! ```

pub mod config;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod hero;
pub mod inference;
pub mod kb;
pub mod percept;
pub mod planner;
pub mod world;
