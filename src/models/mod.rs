pub mod reputation;
pub mod badge;
pub mod error;

pub use reputation::*;
pub use badge::*;
pub use error::*;
