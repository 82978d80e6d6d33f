pub mod knowledge;
pub mod mcp;
pub mod project;
pub mod story;
