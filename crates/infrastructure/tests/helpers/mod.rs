pub mod builders;
pub mod dns_server_mock;
pub mod mock_upstream;
