//! sluice-dns application layer: ports, the query pipeline and use cases.
pub mod pipeline;
pub mod ports;
pub mod use_cases;
