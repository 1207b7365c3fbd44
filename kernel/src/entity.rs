mod book;
mod common;
mod role;

pub use self::{book::*, common::*, role::*};
