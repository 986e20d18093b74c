// Tailoring: prompts, LLM calls, reply normalization and the HTTP handlers
// for the two tailoring endpoints.

pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod prompts;
pub mod service;
