pub mod content;
pub mod ids;
pub mod message;
pub mod tool;
