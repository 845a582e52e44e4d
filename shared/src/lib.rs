pub mod error;
pub mod params;
pub mod protocol;
pub mod types;

pub use error::{MapFormatError, ParameterError, PopulationError, Result, SimError};
pub use params::*;
pub use protocol::*;
pub use types::*;
