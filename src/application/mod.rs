pub mod board;
pub mod command;
