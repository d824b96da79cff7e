use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric rendezvous-room identifier. Rooms exist only while a client
/// is connected to the relay; nothing about them is persisted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who initiates the offer. A two-party call needs exactly one of each.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq)]
pub enum Role {
    Caller,
    Callee,
}

impl Role {
    pub fn is_caller(self) -> bool {
        matches!(self, Role::Caller)
    }
}

impl From<bool> for Role {
    fn from(is_caller: bool) -> Self {
        if is_caller { Role::Caller } else { Role::Callee }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct Participant {
    pub username: String,
    pub role: Role,
}

impl Participant {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}
