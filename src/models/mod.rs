pub mod component;
pub mod detail;
pub mod filters;

pub use component::*;
pub use detail::*;
pub use filters::*;
