mod catalog;
mod entry;
mod hierarchy;
mod notification;
mod role;

pub use catalog::{CategoryCommands, ColumnCommands};
pub use entry::EntryCommands;
pub use hierarchy::{RegionCommands, SchoolCommands, SectorCommands};
pub use notification::NotificationCommands;
pub use role::RoleCommands;
