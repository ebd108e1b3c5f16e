pub mod config_io;
pub mod lock;
pub mod paths;
pub mod recovery;
pub mod session_io;
pub mod store_io;
pub mod watcher;

pub use paths::DataPaths;
