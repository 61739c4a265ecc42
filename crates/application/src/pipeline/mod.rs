//! Ordered chain of decision stages ending in a terminal responder.
//!
//! A [`Pipeline`] is composed once from its stages and is then shared
//! read-only by every in-flight query. Each stage receives a [`Next`]
//! handle to the rest of the chain and either answers on its own or
//! calls [`Next::run`].

mod builder;
mod fake_ip;
mod hosts;
mod mapping;
mod upstream;

pub use builder::PipelineBuilder;
pub use fake_ip::{FakeIpMiddleware, FAKE_IP_TTL};
pub use hosts::HostsMiddleware;
pub use mapping::MappingMiddleware;
pub use upstream::UpstreamResponder;

use crate::ports::DnsHandler;
use async_trait::async_trait;
use sluice_dns_domain::{DnsAnswer, DnsQuery, DomainError, QueryContext};
use std::sync::Arc;

#[async_trait]
pub trait DnsMiddleware: Send + Sync {
    async fn handle(
        &self,
        ctx: &mut QueryContext,
        query: &DnsQuery,
        next: Next<'_>,
    ) -> Result<DnsAnswer, DomainError>;

    fn name(&self) -> &'static str;
}

/// Remainder of the chain as seen from inside a stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn DnsMiddleware>],
    endpoint: &'a dyn DnsHandler,
}

impl<'a> Next<'a> {
    pub async fn run(
        self,
        ctx: &mut QueryContext,
        query: &DnsQuery,
    ) -> Result<DnsAnswer, DomainError> {
        match self.middlewares.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    middlewares: rest,
                    endpoint: self.endpoint,
                };
                stage.handle(ctx, query, next).await
            }
            None => self.endpoint.handle(ctx, query).await,
        }
    }
}

pub struct Pipeline {
    middlewares: Vec<Arc<dyn DnsMiddleware>>,
    endpoint: Arc<dyn DnsHandler>,
}

impl Pipeline {
    /// Stage 0 runs first; an empty list falls straight through to `endpoint`.
    pub fn compose(
        middlewares: Vec<Arc<dyn DnsMiddleware>>,
        endpoint: Arc<dyn DnsHandler>,
    ) -> Self {
        Self {
            middlewares,
            endpoint,
        }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

#[async_trait]
impl DnsHandler for Pipeline {
    async fn handle(
        &self,
        ctx: &mut QueryContext,
        query: &DnsQuery,
    ) -> Result<DnsAnswer, DomainError> {
        let next = Next {
            middlewares: &self.middlewares,
            endpoint: self.endpoint.as_ref(),
        };
        next.run(ctx, query).await
    }
}
