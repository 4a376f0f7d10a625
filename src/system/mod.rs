pub mod logging;
pub mod shutdown;

pub use logging::init_logging;
