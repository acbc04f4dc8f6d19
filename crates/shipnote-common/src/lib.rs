//! Domain types and translation catalog shared by the shipnote crates.

pub mod i18n;
pub mod types;
