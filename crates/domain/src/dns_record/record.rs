use super::RecordType;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// Default TTL for records synthesized from a hosts table.
pub const HOSTS_TTL: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordClass {
    #[default]
    IN,
    Other(u16),
}

impl RecordClass {
    pub fn to_u16(&self) -> u16 {
        match self {
            RecordClass::IN => 1,
            RecordClass::Other(code) => *code,
        }
    }

    pub fn from_u16(code: u16) -> Self {
        match code {
            1 => RecordClass::IN,
            other => RecordClass::Other(other),
        }
    }
}

/// Type-specific payload of an answer record.
///
/// Records the pipeline never inspects travel as `Opaque` with their
/// wire-format rdata so they can be re-emitted unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    PTR(Arc<str>),
    CNAME(Arc<str>),
    Opaque(Arc<[u8]>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub name: Arc<str>,

    pub record_type: RecordType,

    pub class: RecordClass,

    pub ttl: u32,

    pub data: RecordData,
}

impl DnsRecord {
    pub fn a(name: impl Into<Arc<str>>, address: Ipv4Addr, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::A,
            class: RecordClass::IN,
            ttl,
            data: RecordData::A(address),
        }
    }

    pub fn aaaa(name: impl Into<Arc<str>>, address: Ipv6Addr, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::AAAA,
            class: RecordClass::IN,
            ttl,
            data: RecordData::AAAA(address),
        }
    }

    pub fn ptr(name: impl Into<Arc<str>>, target: impl Into<Arc<str>>, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::PTR,
            class: RecordClass::IN,
            ttl,
            data: RecordData::PTR(target.into()),
        }
    }

    pub fn ip(&self) -> Option<std::net::IpAddr> {
        match self.data {
            RecordData::A(v4) => Some(v4.into()),
            RecordData::AAAA(v6) => Some(v6.into()),
            _ => None,
        }
    }
}
