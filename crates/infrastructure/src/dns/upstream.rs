use super::forwarding::{MessageBuilder, ResponseParser, UpstreamResponse};
use super::transport::Transport;
use async_trait::async_trait;
use sluice_dns_application::ports::DnsResolver;
use sluice_dns_domain::{DnsAnswer, DnsQuery, DomainError};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Forwards queries to plain DNS upstreams, trying them in order.
///
/// Each server gets one UDP attempt, repeated over TCP when the reply is
/// truncated. SERVFAIL, REFUSED and NOTIMP replies count as failures and
/// move on to the next server. UDP datagrams with a foreign transaction ID
/// are skipped by the transport; a TCP reply with the wrong ID is an error.
pub struct UpstreamResolver {
    servers: Vec<SocketAddr>,
    timeout: Duration,
}

impl UpstreamResolver {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        info!(
            servers = ?servers,
            timeout_ms = timeout.as_millis() as u64,
            "Upstream resolver created"
        );
        Self { servers, timeout }
    }

    async fn exchange_with(
        &self,
        server: SocketAddr,
        query: &DnsQuery,
    ) -> Result<DnsAnswer, DomainError> {
        let (id, bytes) = MessageBuilder::build_query(query)?;

        let mut response = self.send(Transport::udp(server), id, &bytes).await?;
        if response.truncated {
            debug!(
                server = %server,
                domain = %query.domain,
                "Truncated UDP response, retrying over TCP"
            );
            response = self.send(Transport::tcp(server), id, &bytes).await?;
        }

        if response.is_server_error() {
            return Err(DomainError::TransportError {
                server: server.to_string(),
                message: format!("upstream answered {}", response.answer.response_code),
            });
        }

        Ok(response.answer)
    }

    async fn send(
        &self,
        transport: Transport,
        id: u16,
        bytes: &[u8],
    ) -> Result<UpstreamResponse, DomainError> {
        let raw = transport.send(bytes, self.timeout).await?;
        let response = ResponseParser::parse(&raw.bytes)?;

        if response.id != id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "{} response id {:#06x} does not match query id {:#06x}",
                raw.protocol_used, response.id, id
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl DnsResolver for UpstreamResolver {
    async fn exchange(&self, query: &DnsQuery) -> Result<DnsAnswer, DomainError> {
        let mut last_error = None;

        for server in &self.servers {
            match self.exchange_with(*server, query).await {
                Ok(answer) => {
                    debug!(
                        domain = %query.domain,
                        record_type = %query.record_type,
                        server = %server,
                        rcode = %answer.response_code,
                        answers = answer.answers.len(),
                        "Upstream query successful"
                    );
                    return Ok(answer);
                }
                Err(e) => {
                    warn!(
                        domain = %query.domain,
                        server = %server,
                        error = %e,
                        "Upstream query failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(DomainError::TransportAllServersUnreachable))
    }
}
