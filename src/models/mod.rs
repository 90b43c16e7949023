pub mod enums;
pub mod lab;
pub mod recommendation;

pub use enums::*;
pub use lab::*;
pub use recommendation::*;
