pub mod config;
pub mod record;
pub mod session;
pub mod store;

pub use config::*;
pub use record::*;
pub use session::*;
pub use store::*;
