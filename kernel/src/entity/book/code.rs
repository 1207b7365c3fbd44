use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookCode(String);

impl BookCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}
