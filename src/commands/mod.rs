pub mod add;
pub mod clone;
pub mod completions;
pub mod init;
pub mod list;
pub mod remove;
