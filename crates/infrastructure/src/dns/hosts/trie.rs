use compact_str::CompactString;
use rustc_hash::FxBuildHasher;
use sluice_dns_application::ports::HostsLookup;
use sluice_dns_domain::{DomainError, HostRecord};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Matches exactly one label.
const WILDCARD: &str = "*";
/// Matches the parent itself and any depth below it.
const DOT_WILDCARD: &str = "+";

const MAX_DOMAIN_LEN: usize = 253;

struct TrieNode<T> {
    children: HashMap<CompactString, TrieNode<T>, FxBuildHasher>,
    data: Option<T>,
}

impl<T> TrieNode<T> {
    fn new() -> Self {
        Self {
            children: HashMap::with_hasher(FxBuildHasher),
            data: None,
        }
    }
}

/// Label-reversed domain trie with `*.` and `+.` wildcards.
///
/// Lookup precedence at every level is exact label, then `*`, then `+`.
/// Keys are case-insensitive and a trailing root dot is ignored.
pub struct DomainTrie<T> {
    root: TrieNode<T>,
    len: usize,
}

impl<T> Default for DomainTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DomainTrie<T> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::new(),
            len: 0,
        }
    }

    /// Insert or replace the value stored for `domain`.
    pub fn insert(&mut self, domain: &str, data: T) -> Result<(), DomainError> {
        let domain = normalize(domain);
        let labels = split_labels(&domain)
            .ok_or_else(|| DomainError::InvalidDomainName(domain.clone()))?;

        // `+` is only meaningful as the leftmost label.
        if labels[..labels.len() - 1].contains(&DOT_WILDCARD) {
            return Err(DomainError::InvalidDomainName(domain.clone()));
        }

        let mut node = &mut self.root;
        for label in labels {
            node = node
                .children
                .entry(CompactString::new(label))
                .or_insert_with(TrieNode::new);
        }

        if node.data.replace(data).is_none() {
            self.len += 1;
        }
        Ok(())
    }

    pub fn search(&self, domain: &str) -> Option<&T> {
        let domain = normalize(domain);
        let labels = split_labels(&domain)?;
        search_node(&self.root, &labels)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn search_node<'a, T>(node: &'a TrieNode<T>, labels: &[&str]) -> Option<&'a T> {
    let Some((label, rest)) = labels.split_first() else {
        return node.data.as_ref().or_else(|| {
            node.children
                .get(DOT_WILDCARD)
                .and_then(|c| c.data.as_ref())
        });
    };

    if let Some(found) = node
        .children
        .get(*label)
        .and_then(|child| search_node(child, rest))
    {
        return Some(found);
    }

    if let Some(found) = node
        .children
        .get(WILDCARD)
        .and_then(|child| search_node(child, rest))
    {
        return Some(found);
    }

    node.children
        .get(DOT_WILDCARD)
        .and_then(|c| c.data.as_ref())
}

fn normalize(domain: &str) -> String {
    domain.trim_end_matches('.').to_ascii_lowercase()
}

/// Labels in reverse order, or `None` if the name has an empty label.
fn split_labels(domain: &str) -> Option<SmallVec<[&str; 8]>> {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return None;
    }
    let labels: SmallVec<[&str; 8]> = domain.split('.').rev().collect();
    if labels.iter().any(|l| l.is_empty()) {
        return None;
    }
    Some(labels)
}

impl HostsLookup for DomainTrie<HostRecord> {
    fn search(&self, name: &str) -> Option<&HostRecord> {
        DomainTrie::search(self, name)
    }
}
