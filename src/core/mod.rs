//! Storage core: block layout, codec, file I/O and the record store,
//! plus the interchange adapters and configuration they share

pub mod adapters;
pub mod codec;
pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod record;
pub mod store;
