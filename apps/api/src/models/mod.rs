pub mod conversation;

pub use conversation::{ChatTurn, Role};
