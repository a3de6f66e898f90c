//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod activity_log;
pub mod admin_contact;
pub mod agenda_event;
pub mod artwork;
pub mod budget;
pub mod contact_message;
pub mod digital_art;
pub mod finance;
pub mod newsletter;
pub mod note;
pub mod order;
pub mod session;
pub mod site_info;
pub mod stats;
pub mod task;
pub mod user;
