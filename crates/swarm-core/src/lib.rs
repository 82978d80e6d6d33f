pub mod config;
pub mod dimensions;
pub mod error;
pub mod extract;
pub mod frontmatter;
pub mod io;
pub mod knowledge;
pub mod lifecycle;
pub mod ops;
pub mod paths;
pub mod retro;
pub mod story;
pub mod types;
pub mod validate;

pub use error::{Result, SwarmError};
