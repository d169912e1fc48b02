pub mod hosts_file;

pub use hosts_file::{parse_hosts, HostsCache, HostsFileLoader};
