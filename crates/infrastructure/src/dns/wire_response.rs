//! Encodes pipeline answers back into wire-format replies.

use super::forwarding::{MessageBuilder, RecordTypeMapper};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode as HickoryResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, NULL, PTR};
use hickory_proto::rr::{Name, RData, Record};
use sluice_dns_domain::{DnsAnswer, DnsRecord, DomainError, RecordData, ResponseCode};
use std::str::FromStr;

/// Plain DNS over UDP without EDNS(0).
pub const DEFAULT_UDP_PAYLOAD: usize = 512;

/// Reply to `request` carrying `answer`. If the encoding exceeds
/// `max_size`, the records are dropped and TC is set instead.
pub fn build_answer_response(
    request: &Message,
    answer: &DnsAnswer,
    max_size: usize,
) -> Result<Vec<u8>, DomainError> {
    let mut response = response_skeleton(request, answer.response_code);
    response.set_authoritative(answer.authoritative);
    response.set_recursion_available(answer.recursion_available);
    response.add_answers(
        answer
            .answers
            .iter()
            .map(record_to_hickory)
            .collect::<Result<Vec<_>, _>>()?,
    );
    response.add_name_servers(
        answer
            .authority
            .iter()
            .map(record_to_hickory)
            .collect::<Result<Vec<_>, _>>()?,
    );

    let bytes = MessageBuilder::serialize_message(&response)?;
    if bytes.len() <= max_size {
        return Ok(bytes);
    }

    let mut truncated = response_skeleton(request, answer.response_code);
    truncated.set_authoritative(answer.authoritative);
    truncated.set_recursion_available(answer.recursion_available);
    truncated.set_truncated(true);
    MessageBuilder::serialize_message(&truncated)
}

/// Reply to `request` with no records and the given code.
pub fn build_error_response(
    request: &Message,
    code: ResponseCode,
) -> Result<Vec<u8>, DomainError> {
    let mut response = response_skeleton(request, code);
    response.set_recursion_available(true);
    MessageBuilder::serialize_message(&response)
}

/// FORMERR for a datagram that could not be decoded at all; only the ID
/// is echoed.
pub fn build_format_error(raw_request: &[u8]) -> Option<Vec<u8>> {
    let id = u16::from_be_bytes([*raw_request.first()?, *raw_request.get(1)?]);
    let mut response = Message::new(id, MessageType::Response, OpCode::Query);
    response.set_response_code(HickoryResponseCode::FormErr);
    MessageBuilder::serialize_message(&response).ok()
}

fn response_skeleton(request: &Message, code: ResponseCode) -> Message {
    let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
    response.set_recursion_desired(request.recursion_desired());
    response.set_response_code(to_hickory_rcode(code));
    response.add_queries(request.queries().iter().cloned());
    response
}

/// Split into the EDNS high bits and the 4-bit header code.
fn to_hickory_rcode(code: ResponseCode) -> HickoryResponseCode {
    let value = code.to_u16();
    HickoryResponseCode::from(((value >> 4) & 0xff) as u8, (value & 0x0f) as u8)
}

fn record_to_hickory(record: &DnsRecord) -> Result<Record, DomainError> {
    let name = parse_name(&record.name)?;
    let rdata = match &record.data {
        RecordData::A(ip) => RData::A(A(*ip)),
        RecordData::AAAA(ip) => RData::AAAA(AAAA(*ip)),
        RecordData::PTR(target) => RData::PTR(PTR(parse_name(target)?)),
        RecordData::CNAME(target) => RData::CNAME(CNAME(parse_name(target)?)),
        RecordData::Opaque(bytes) => RData::Unknown {
            code: RecordTypeMapper::to_hickory(record.record_type),
            rdata: NULL::with(bytes.to_vec()),
        },
    };
    Ok(Record::from_rdata(name, record.ttl, rdata))
}

fn parse_name(name: &str) -> Result<Name, DomainError> {
    Name::from_str(name)
        .map_err(|e| DomainError::InvalidDomainName(format!("Invalid name '{}': {}", name, e)))
}
