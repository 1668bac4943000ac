pub mod account;
pub mod categories;
pub mod init;
pub mod take;
