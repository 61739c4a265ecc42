mod helpers;

use helpers::{query, upstream_a, MockDnsResolver};
use sluice_dns_application::pipeline::UpstreamResponder;
use sluice_dns_application::ports::DnsHandler;
use sluice_dns_domain::{DnsType, DomainError, QueryContext, RecordType, ResponseCode};
use std::sync::Arc;

#[tokio::test]
async fn test_tags_raw_and_marks_authoritative() {
    let resolver = Arc::new(MockDnsResolver::new());
    resolver.set_answer("example.com", upstream_a("example.com.", "93.184.216.34", 300));
    let responder = UpstreamResponder::new(resolver.clone(), false);

    let mut ctx = QueryContext::new();
    let answer = responder
        .handle(&mut ctx, &query("example.com.", RecordType::A))
        .await
        .unwrap();

    assert_eq!(ctx.dns_type(), Some(DnsType::Raw));
    assert!(answer.authoritative);
    assert_eq!(answer.response_code, ResponseCode::NoError);
    assert_eq!(answer.answers[0].ttl, 300);
}

#[tokio::test]
async fn test_keeps_upstream_response_code() {
    let resolver = Arc::new(MockDnsResolver::new());
    let responder = UpstreamResponder::new(resolver.clone(), false);

    let mut ctx = QueryContext::new();
    let answer = responder
        .handle(&mut ctx, &query("missing.example.", RecordType::A))
        .await
        .unwrap();

    assert_eq!(answer.response_code, ResponseCode::NXDomain);
    assert!(answer.authoritative);
}

#[tokio::test]
async fn test_aaaa_with_ipv6_disabled_skips_upstream() {
    let resolver = Arc::new(MockDnsResolver::new());
    let responder = UpstreamResponder::new(resolver.clone(), false);

    let mut ctx = QueryContext::new();
    let answer = responder
        .handle(&mut ctx, &query("example.com.", RecordType::AAAA))
        .await
        .unwrap();

    assert!(answer.is_empty());
    assert_eq!(answer.response_code, ResponseCode::NoError);
    assert_eq!(ctx.dns_type(), Some(DnsType::Raw));
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn test_aaaa_with_ipv6_enabled_goes_upstream() {
    let resolver = Arc::new(MockDnsResolver::new());
    let responder = UpstreamResponder::new(resolver.clone(), true);

    let mut ctx = QueryContext::new();
    responder
        .handle(&mut ctx, &query("example.com.", RecordType::AAAA))
        .await
        .unwrap();

    assert_eq!(resolver.calls(), 1);
    assert_eq!(resolver.queries()[0].record_type, RecordType::AAAA);
}

#[tokio::test]
async fn test_failure_is_returned_unchanged() {
    let resolver = Arc::new(MockDnsResolver::new());
    resolver.set_error(DomainError::TransportAllServersUnreachable);
    let responder = UpstreamResponder::new(resolver.clone(), true);

    let mut ctx = QueryContext::new();
    let result = responder
        .handle(&mut ctx, &query("example.com.", RecordType::A))
        .await;

    assert_eq!(result, Err(DomainError::TransportAllServersUnreachable));
    assert_eq!(ctx.dns_type(), Some(DnsType::Raw));
}
