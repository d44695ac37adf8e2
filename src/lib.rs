//! A research-report agent: a language model with two search tools, a
//! bounded tool-calling loop, a structured self-critique pass, and a
//! final HTML conversion. The stages compose into a pipeline
//! (research → reflection → formatting) but each is independently
//! callable.

pub mod agent;
pub mod artifact;
pub mod errors;
pub mod formatting;
pub mod providers;
pub mod reflection;
pub mod tools;
