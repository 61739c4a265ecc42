use sluice_dns_application::ports::HostsLookup;
use sluice_dns_domain::HostRecord;
use sluice_dns_infrastructure::dns::hosts::{
    forward_trie_from_pairs, ip_to_ptr, load_hosts_file, parse_hosts, trie_from_pairs,
};
use std::io::Write;
use std::net::IpAddr;
use std::sync::Arc;

fn addresses(record: Option<&HostRecord>) -> Vec<IpAddr> {
    match record {
        Some(HostRecord::Addresses(addrs)) => addrs.clone(),
        other => panic!("expected addresses, got {other:?}"),
    }
}

fn pointers(record: Option<&HostRecord>) -> Vec<Arc<str>> {
    match record {
        Some(HostRecord::Pointers(names)) => names.clone(),
        other => panic!("expected pointers, got {other:?}"),
    }
}

#[test]
fn test_parse_basic_entries() {
    let trie = parse_hosts(
        "127.0.0.1 localhost\n\
         10.0.0.5   router.lan   gw.lan\n\
         ::1 localhost\n",
    );

    assert_eq!(
        addresses(trie.search("localhost")),
        vec!["127.0.0.1".parse::<IpAddr>().unwrap(), "::1".parse().unwrap()]
    );
    let router: IpAddr = "10.0.0.5".parse().unwrap();
    assert_eq!(addresses(trie.search("router.lan")), vec![router]);
    assert_eq!(addresses(trie.search("gw.lan")), vec![router]);
}

#[test]
fn test_parse_skips_comments_and_junk() {
    let trie = parse_hosts(
        "# comment\n\
         // another comment\n\
         \n\
         not-an-ip host.example\n\
         10.0.0.9 café.example\n\
         \t10.0.0.7\tindented.example\n",
    );

    assert!(trie.search("host.example").is_none());
    assert!(trie.search("café.example").is_none());
    assert_eq!(
        addresses(trie.search("indented.example")),
        vec!["10.0.0.7".parse::<IpAddr>().unwrap()]
    );
}

#[test]
fn test_parse_lowercases_names() {
    let trie = parse_hosts("10.0.0.5 NAS.Lan\n");

    assert!(trie.search("nas.lan").is_some());
    assert!(trie.search("NAS.LAN").is_some());
}

#[test]
fn test_wildcard_entry() {
    let trie = parse_hosts("10.1.1.1 *.dev.lan\n");

    assert!(trie.search("app.dev.lan").is_some());
    assert!(trie.search("dev.lan").is_none());
}

#[test]
fn test_reverse_pointers() {
    let trie = parse_hosts("10.0.0.5 router.lan gw.lan\n");

    let names = pointers(trie.search("5.0.0.10.in-addr.arpa"));

    assert_eq!(names.len(), 2);
    assert!(names.iter().any(|n| &**n == "router.lan."));
    assert!(names.iter().any(|n| &**n == "gw.lan."));
}

#[test]
fn test_ip_to_ptr_v4() {
    assert_eq!(
        ip_to_ptr("192.168.1.20".parse().unwrap()),
        "20.1.168.192.in-addr.arpa"
    );
}

#[test]
fn test_ip_to_ptr_v6() {
    assert_eq!(
        ip_to_ptr("2001:db8::1".parse().unwrap()),
        "1.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa"
    );
}

#[test]
fn test_trie_from_pairs() {
    let trie = trie_from_pairs(vec![
        ("Printer.Lan".to_string(), "10.0.0.20".parse().unwrap()),
        ("bad..name".to_string(), "10.0.0.21".parse().unwrap()),
    ]);

    assert_eq!(
        addresses(HostsLookup::search(&trie, "printer.lan")),
        vec!["10.0.0.20".parse::<IpAddr>().unwrap()]
    );
    assert!(trie.search("bad..name").is_none());
}

#[test]
fn test_wildcard_names_get_no_reverse_entry() {
    let trie = trie_from_pairs(vec![
        ("+.example.com".to_string(), "10.0.0.1".parse().unwrap()),
        ("*.dev.lan".to_string(), "10.0.0.2".parse().unwrap()),
        ("nas.lan".to_string(), "10.0.0.2".parse().unwrap()),
    ]);

    assert!(trie.search("api.example.com").is_some());
    assert!(trie.search("1.0.0.10.in-addr.arpa").is_none());
    assert_eq!(
        pointers(trie.search("2.0.0.10.in-addr.arpa")),
        vec![Arc::<str>::from("nas.lan.")]
    );
}

#[test]
fn test_forward_only_trie_has_no_pointers() {
    let trie = forward_trie_from_pairs(vec![
        ("router.lan".to_string(), "10.0.0.5".parse().unwrap()),
        ("+.example.com".to_string(), "10.0.0.1".parse().unwrap()),
    ]);

    assert_eq!(
        addresses(trie.search("router.lan")),
        vec!["10.0.0.5".parse::<IpAddr>().unwrap()]
    );
    assert!(trie.search("example.com").is_some());
    assert!(trie.search("5.0.0.10.in-addr.arpa").is_none());
    assert!(trie.search("1.0.0.10.in-addr.arpa").is_none());
    assert_eq!(trie.len(), 2);
}

#[test]
fn test_load_hosts_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# test hosts").unwrap();
    writeln!(file, "10.9.8.7 from-file.lan").unwrap();

    let trie = load_hosts_file(file.path()).unwrap();

    assert_eq!(
        addresses(trie.search("from-file.lan")),
        vec!["10.9.8.7".parse::<IpAddr>().unwrap()]
    );
}

#[test]
fn test_load_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();

    assert!(load_hosts_file(&dir.path().join("missing")).is_err());
}
