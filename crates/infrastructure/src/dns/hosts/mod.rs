mod loader;
mod trie;

pub use loader::{
    forward_trie_from_pairs, hosts_path, ip_to_ptr, load_hosts_file, load_system_hosts,
    parse_hosts, trie_from_pairs,
};
pub use trie::DomainTrie;
