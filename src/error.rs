//! Diagnostic error types for the agent, the simulator and configuration.

use miette::Diagnostic;
use thiserror::Error;

use crate::grid::Cell;

/// Errors raised by the reasoning core.
#[derive(Debug, Error, Diagnostic)]
pub enum AgentError {
    #[error("no safe path from {from} to {to}")]
    #[diagnostic(
        code(wumpus::agent::no_path),
        help(
            "The frontier selector only proposes targets reachable through safe cells, \
             so this indicates the knowledge base and the selector disagree."
        )
    )]
    NoPath { from: Cell, to: Cell },

    #[error("invalid percept: {reason}")]
    #[diagnostic(
        code(wumpus::agent::invalid_percept),
        help(
            "A percept must carry all five flags (breeze, stench, glitter, bump, scream) \
             and be consistent with the previous action."
        )
    )]
    InvalidPercept { reason: String },

    #[error("the episode is over")]
    #[diagnostic(
        code(wumpus::agent::episode_over),
        help("Call `new_episode()` before asking for further actions.")
    )]
    EpisodeOver,
}

/// Convenience alias for agent operations.
pub type AgentResult<T> = std::result::Result<T, AgentError>;

#[derive(Debug, Error, Diagnostic)]
pub enum WorldError {
    #[error("invalid world dimensions {width}x{height}")]
    #[diagnostic(
        code(wumpus::world::dimensions),
        help("The world needs at least two cells: the start and one for the Wumpus.")
    )]
    Dimensions { width: i32, height: i32 },

    #[error("pit probability {value} is outside [0, 1]")]
    #[diagnostic(code(wumpus::world::pit_probability))]
    PitProbability { value: f64 },

    #[error("the episode has already ended")]
    #[diagnostic(
        code(wumpus::world::finished),
        help("Reset the world before stepping it again.")
    )]
    Finished,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Agent(#[from] AgentError),
}

pub type WorldResult<T> = std::result::Result<T, WorldError>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config \"{path}\": {source}")]
    #[diagnostic(
        code(wumpus::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config \"{path}\": {message}")]
    #[diagnostic(
        code(wumpus::config::parse),
        help("The config is TOML with optional [agent] and [world] tables.")
    )]
    Parse { path: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
