use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Capability {
    DeleteBook,
}

impl Role {
    pub fn has_capability(&self, capability: Capability) -> bool {
        match (self, capability) {
            (Role::Admin, Capability::DeleteBook) => true,
            (Role::User, Capability::DeleteBook) => false,
        }
    }
}

impl FromStr for Role {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            _ => Err(Report::new(KernelError::InvalidArgument)
                .attach_printable(format!("Unknown role: {s}"))),
        }
    }
}
