//! Turns a chat's recent history into a generated narrative summary.

pub mod pipeline;
pub mod prompt;

pub use pipeline::{Summarizer, strip_reasoning};
pub use prompt::{SUMMARY_TEMPLATE, build_prompt, transcript_line};
