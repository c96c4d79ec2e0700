pub mod error;
pub mod init;
