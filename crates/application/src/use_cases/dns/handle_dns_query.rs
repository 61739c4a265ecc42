use crate::ports::DnsHandler;
use sluice_dns_domain::{DnsAnswer, DnsQuery, DnsType, DomainError, QueryContext};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub answer: DnsAnswer,
    /// Stage that produced the answer; `None` only if no stage tagged it.
    pub dns_type: Option<DnsType>,
}

pub struct HandleDnsQueryUseCase {
    handler: Arc<dyn DnsHandler>,
}

impl HandleDnsQueryUseCase {
    pub fn new(handler: Arc<dyn DnsHandler>) -> Self {
        Self { handler }
    }

    pub async fn execute(&self, query: &DnsQuery) -> Result<QueryOutcome, DomainError> {
        let start = Instant::now();
        let mut ctx = QueryContext::new();

        match self.handler.handle(&mut ctx, query).await {
            Ok(answer) => {
                debug!(
                    domain = %query.domain,
                    record_type = %query.record_type,
                    dns_type = ctx.dns_type().map(|t| t.as_str()).unwrap_or("none"),
                    rcode = %answer.response_code,
                    answers = answer.answers.len(),
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "Query answered"
                );
                Ok(QueryOutcome {
                    answer,
                    dns_type: ctx.dns_type(),
                })
            }
            Err(e) => {
                debug!(
                    domain = %query.domain,
                    record_type = %query.record_type,
                    error = %e,
                    elapsed_us = start.elapsed().as_micros() as u64,
                    "Query failed"
                );
                Err(e)
            }
        }
    }
}
