pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod region;
pub mod segment;
pub mod signal;
pub mod unwrap;

pub use config::*;
pub use error::*;
pub use region::*;
pub use segment::*;
pub use signal::*;
pub use unwrap::*;
