use serde::{Deserialize, Serialize};
use std::fmt;

mod memory;

pub use memory::InMemoryPersonDirectory;

/// Stable identifier of an enrolled person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub String);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared class shift of an enrolled person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    Morning,
    Afternoon,
}

impl Shift {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
        }
    }
}

/// One enrolled person as seen by the reconciliation engine.
///
/// The registration is the code punched at the turnstile; it is matched both
/// verbatim and with leading zeros stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    pub registration: String,
    pub shift: Shift,
}

/// Read model of the enrolled population.
///
/// The engine fetches one snapshot at run start and never writes back.
pub trait PersonDirectory: Send + Sync {
    fn snapshot(&self) -> Result<Vec<PersonRecord>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("person directory unavailable: {0}")]
    Unavailable(String),
}
