use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::Message;
use hickory_proto::rr::{RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use sluice_dns_domain::{
    DnsAnswer, DnsRecord, DomainError, RecordClass, RecordData, ResponseCode,
};
use std::sync::Arc;
use tracing::debug;

/// Upstream reply converted to the domain model, plus the header bits the
/// exchange layer still needs.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub id: u16,
    pub truncated: bool,
    pub answer: DnsAnswer,
}

impl UpstreamResponse {
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.answer.response_code,
            ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::NotImp
        )
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<UpstreamResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let answers = message
            .answers()
            .iter()
            .map(record_from_hickory)
            .collect::<Result<Vec<_>, _>>()?;
        let authority = message
            .name_servers()
            .iter()
            .map(record_from_hickory)
            .collect::<Result<Vec<_>, _>>()?;

        let answer = DnsAnswer {
            response_code: ResponseCode::from_u16(u16::from(message.response_code())),
            authoritative: message.authoritative(),
            recursion_available: message.recursion_available(),
            answers,
            authority,
        };

        debug!(
            rcode = %answer.response_code,
            answers = answer.answers.len(),
            authority = answer.authority.len(),
            truncated = message.truncated(),
            "DNS response parsed"
        );

        Ok(UpstreamResponse {
            id: message.id(),
            truncated: message.truncated(),
            answer,
        })
    }
}

/// Convert one hickory record. Types the pipeline never inspects keep
/// their rdata as uncompressed wire bytes.
pub(crate) fn record_from_hickory(record: &Record) -> Result<DnsRecord, DomainError> {
    let data = match record.data() {
        RData::A(a) => RecordData::A(a.0),
        RData::AAAA(aaaa) => RecordData::AAAA(aaaa.0),
        RData::PTR(ptr) => RecordData::PTR(Arc::from(ptr.to_utf8())),
        RData::CNAME(canonical) => RecordData::CNAME(Arc::from(canonical.to_utf8())),
        other => RecordData::Opaque(Arc::from(rdata_bytes(other)?)),
    };

    Ok(DnsRecord {
        name: Arc::from(record.name().to_utf8()),
        record_type: RecordTypeMapper::from_hickory(record.record_type()),
        class: RecordClass::from_u16(u16::from(record.dns_class())),
        ttl: record.ttl(),
        data,
    })
}

fn rdata_bytes(rdata: &RData) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::new();
    let mut encoder = BinEncoder::new(&mut buf);
    // Compression pointers would be relative to this scratch buffer.
    encoder.set_canonical_form(true);
    rdata.emit(&mut encoder).map_err(|e| {
        DomainError::InvalidDnsResponse(format!("Failed to encode rdata: {}", e))
    })?;
    Ok(buf)
}
