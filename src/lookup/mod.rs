pub mod client;

pub use client::{lookup_with_timeout, HttpLookupClient, NationalIdLookup};
