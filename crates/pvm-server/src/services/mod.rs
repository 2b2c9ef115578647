//! Storefront, storage and remote file host collaborators.

pub mod file_host;
pub mod options;
pub mod pg_store;
pub mod store;

#[cfg(test)]
pub mod memory;
