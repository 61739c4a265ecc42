use sluice_dns_domain::HostRecord;

/// Read-only name lookup built from a hosts-style source.
///
/// `name` is already lower-cased and stripped of its trailing dot.
pub trait HostsLookup: Send + Sync {
    fn search(&self, name: &str) -> Option<&HostRecord>;
}
