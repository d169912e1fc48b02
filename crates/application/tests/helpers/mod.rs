pub mod mock_resolver;
pub mod mock_store;
