//! dnscache application layer: ports at the seams between the cache
//! engine, the resolvers and their external collaborators.
pub mod ports;
pub mod use_cases;
