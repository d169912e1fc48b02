pub mod logging;
pub mod system;

pub use logging::init_logging;
pub use system::{
    build_default_resolver, build_resolver_with, close_on_shutdown, close_on_signal,
    install_default_resolver, install_resolver, system_resolver, CachingStack, ShutdownSignal,
};
