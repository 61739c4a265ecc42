//! sluice-dns infrastructure: adapters behind the application ports and
//! the wire-level request handler.
pub mod dns;
