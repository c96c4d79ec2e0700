pub mod add;
pub mod cmd;
pub mod contexts;
pub mod error;
