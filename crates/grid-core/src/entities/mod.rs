//! Entity structs for all Schoolgrid domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `grid-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema validation.

mod category;
mod entry;
mod hierarchy;
mod history;
mod notification;
mod role;

pub use category::{Category, ColumnDefinition};
pub use entry::DataEntry;
pub use hierarchy::{Region, School, Sector};
pub use history::DataHistory;
pub use notification::{InboxItem, Notification};
pub use role::UserRole;
