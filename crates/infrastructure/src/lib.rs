//! dnscache infrastructure: the cache engine, its persistence adapters,
//! the caching resolvers and the network/system collaborators they need.
pub mod bootstrap;
pub mod dns;
pub mod system;
