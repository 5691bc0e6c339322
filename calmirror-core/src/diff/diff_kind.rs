use std::fmt;

use serde::{Deserialize, Serialize};

/// Mirroring never updates in place: a changed event is a delete plus a create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffKind {
    Create,
    Delete,
}

impl DiffKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            DiffKind::Create => "+",
            DiffKind::Delete => "-",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            DiffKind::Create => "create",
            DiffKind::Delete => "delete",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
