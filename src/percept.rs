//! What crosses the boundary between the agent and the world.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult};

/// The five local signals reported after every action.
///
/// Every field is required when deserializing; a bundle with a missing or
/// unknown flag is rejected rather than defaulted.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Percept {
    pub breeze: bool,
    pub stench: bool,
    pub glitter: bool,
    pub bump: bool,
    pub scream: bool,
}

impl Percept {
    pub const FIELDS: [&'static str; 5] = ["breeze", "stench", "glitter", "bump", "scream"];

    /// Builds a percept from `(name, value)` pairs, failing on a missing,
    /// repeated or unknown name.
    pub fn from_fields<'a, I>(fields: I) -> AgentResult<Self>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut slots: [Option<bool>; 5] = [None; 5];
        for (name, value) in fields {
            let Some(idx) = Self::FIELDS.iter().position(|f| *f == name) else {
                return Err(AgentError::InvalidPercept {
                    reason: format!("unknown field \"{name}\""),
                });
            };
            if slots[idx].replace(value).is_some() {
                return Err(AgentError::InvalidPercept {
                    reason: format!("field \"{name}\" given twice"),
                });
            }
        }
        let get = |idx: usize| {
            slots[idx].ok_or_else(|| AgentError::InvalidPercept {
                reason: format!("missing field \"{}\"", Self::FIELDS[idx]),
            })
        };
        Ok(Self {
            breeze: get(0)?,
            stench: get(1)?,
            glitter: get(2)?,
            bump: get(3)?,
            scream: get(4)?,
        })
    }
}

impl TryFrom<&BTreeMap<String, bool>> for Percept {
    type Error = AgentError;

    fn try_from(map: &BTreeMap<String, bool>) -> AgentResult<Self> {
        Self::from_fields(map.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

impl fmt::Display for Percept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.breeze, "breeze"),
            (self.stench, "stench"),
            (self.glitter, "glitter"),
            (self.bump, "bump"),
            (self.scream, "scream"),
        ];
        let on: Vec<&str> = flags.iter().filter(|(b, _)| *b).map(|(_, n)| *n).collect();
        if on.is_empty() {
            f.write_str("[]")
        } else {
            write!(f, "[{}]", on.join(", "))
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Left,
    Right,
    Grab,
    Shoot,
    Climb,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Forward => "FORWARD",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Grab => "GRAB",
            Self::Shoot => "SHOOT",
            Self::Climb => "CLIMB",
        };
        f.write_str(name)
    }
}
