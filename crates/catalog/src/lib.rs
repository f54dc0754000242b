//! Catalog backend access: the reqwest client and the wire format it speaks.

pub mod client;
mod wire;

pub use client::HttpCatalogClient;
