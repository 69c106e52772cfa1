pub mod error;
pub mod file;
pub mod filesystem;
pub mod result;

pub use error::*;
pub use file::*;
pub use filesystem::*;
pub use result::*;
