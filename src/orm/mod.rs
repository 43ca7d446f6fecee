pub mod answers;
pub mod comments;
pub mod questions;
pub mod votes;
