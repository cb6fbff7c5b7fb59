pub mod catalog;
pub mod munje;
pub mod session;
