pub mod stages;

pub use stages::*;
