use std::net::IpAddr;
use std::sync::Arc;

/// Payload attached to a name in a hosts table.
///
/// A forward name carries the addresses it resolves to; a reverse-lookup
/// name (`…in-addr.arpa` / `…ip6.arpa`) carries the pointer names that own
/// the address. The two kinds are never mixed under one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRecord {
    Addresses(Vec<IpAddr>),
    Pointers(Vec<Arc<str>>),
}
