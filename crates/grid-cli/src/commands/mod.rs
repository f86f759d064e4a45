pub mod catalog;
pub mod dispatch;
pub mod entry;
pub mod hierarchy;
pub mod init;
pub mod notification;
pub mod role;
pub mod shared;
