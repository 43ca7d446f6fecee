pub mod answer;
pub mod client;
pub mod comment;
pub mod db;
pub mod error;
pub mod orm;
pub mod pagination;
pub mod question;
pub mod score;
pub mod target;
pub mod vote;
pub mod web;

pub use crate::db::get_db_pool;
