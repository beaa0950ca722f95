//! Client for the ESI meta API.

mod client;
mod transport;

pub use client::EsiClient;
pub use transport::{MetaTransport, ReqwestTransport, TransportFuture};
