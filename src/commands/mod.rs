pub mod init;
pub mod team;
