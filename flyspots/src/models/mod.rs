pub mod coordinates;
pub mod error;
pub mod macros;
pub mod review;
pub mod spot;

pub use coordinates::*;
pub use error::*;
pub use review::*;
pub use spot::*;
