//! Pure domain logic for the gallery backend.
//!
//! Everything in this crate is synchronous and free of I/O so it can be unit
//! tested in isolation and shared by the repository and HTTP layers.

pub mod agenda;
pub mod artwork;
pub mod artwork_code;
pub mod budget;
pub mod contact;
pub mod crm;
pub mod digital_art;
pub mod error;
pub mod finance;
pub mod hashing;
pub mod media;
pub mod newsletter;
pub mod notes;
pub mod order;
pub mod pagination;
pub mod payments;
pub mod roles;
pub mod site_info;
pub mod slug;
pub mod stats;
pub mod tasks;
pub mod types;
pub mod validation;
