pub mod error;
pub mod market;
pub mod processed;
pub mod result;
pub mod types;

pub use error::*;
pub use market::*;
pub use processed::*;
pub use result::*;
pub use types::*;
