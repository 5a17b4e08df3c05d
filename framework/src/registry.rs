pub mod command;
pub mod event;
pub mod helper;
pub mod layered;
