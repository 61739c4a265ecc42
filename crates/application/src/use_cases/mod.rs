pub mod dns;

pub use dns::{FindHostByIpUseCase, HandleDnsQueryUseCase, QueryOutcome};
