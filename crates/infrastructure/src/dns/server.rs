use super::forwarding::RecordTypeMapper;
use super::wire_response::{
    build_answer_response, build_error_response, build_format_error, DEFAULT_UDP_PAYLOAD,
};
use hickory_proto::op::{Message, MessageType, OpCode};
use sluice_dns_application::use_cases::HandleDnsQueryUseCase;
use sluice_dns_domain::{DnsQuery, ResponseCode};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Largest reply sent over TCP.
pub const MAX_TCP_PAYLOAD: usize = u16::MAX as usize;

/// Turns raw request bytes into raw reply bytes around the query use case.
///
/// Requests that are not a standard query with exactly one question are
/// answered FORMERR (or NOTIMP for other opcodes) without reaching the
/// pipeline. Pipeline failures become SERVFAIL.
#[derive(Clone)]
pub struct DnsRequestHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsRequestHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Handle a UDP datagram; the reply honours the client's EDNS(0)
    /// payload size, or 512 bytes without it.
    pub async fn handle_udp(&self, request_bytes: &[u8]) -> Option<Vec<u8>> {
        self.handle_bytes(request_bytes, None).await
    }

    pub async fn handle_tcp(&self, request_bytes: &[u8]) -> Option<Vec<u8>> {
        self.handle_bytes(request_bytes, Some(MAX_TCP_PAYLOAD)).await
    }

    /// `None` means there is nothing sensible to send back.
    pub async fn handle_bytes(
        &self,
        request_bytes: &[u8],
        max_size: Option<usize>,
    ) -> Option<Vec<u8>> {
        let request = match Message::from_vec(request_bytes) {
            Ok(message) => message,
            Err(e) => {
                debug!(error = %e, len = request_bytes.len(), "Undecodable DNS request");
                return build_format_error(request_bytes);
            }
        };

        if request.message_type() != MessageType::Query {
            return None;
        }

        if request.op_code() != OpCode::Query {
            return reply_error(&request, ResponseCode::NotImp);
        }

        let [question] = request.queries() else {
            warn!(
                questions = request.queries().len(),
                "Rejecting request without exactly one question"
            );
            return reply_error(&request, ResponseCode::FormErr);
        };

        let query = DnsQuery::new(
            question.name().to_utf8(),
            RecordTypeMapper::from_hickory(question.query_type()),
        );

        let max_size = max_size.unwrap_or_else(|| udp_payload_limit(&request));

        match self.use_case.execute(&query).await {
            Ok(outcome) => match build_answer_response(&request, &outcome.answer, max_size) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    error!(query = %query, error = %e, "Failed to encode DNS response");
                    reply_error(&request, ResponseCode::ServFail)
                }
            },
            Err(e) => {
                debug!(query = %query, error = %e, "Query resolution failed");
                reply_error(&request, ResponseCode::ServFail)
            }
        }
    }
}

fn udp_payload_limit(request: &Message) -> usize {
    request
        .extensions()
        .as_ref()
        .map_or(DEFAULT_UDP_PAYLOAD, |edns| {
            usize::from(edns.max_payload()).max(DEFAULT_UDP_PAYLOAD)
        })
}

fn reply_error(request: &Message, code: ResponseCode) -> Option<Vec<u8>> {
    match build_error_response(request, code) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!(error = %e, code = %code, "Failed to encode error response");
            None
        }
    }
}
