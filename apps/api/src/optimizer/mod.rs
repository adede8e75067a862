// Resume Optimization Engine
// Implements: text extraction, per-section optimization, orchestration,
// ATS scoring, and result assembly.
// All backend calls go through the injected TextGenerator.

pub mod assembler;
pub mod ats;
pub mod extractor;
pub mod handlers;
pub mod pacing;
pub mod pipeline;
pub mod prompts;
pub mod section;

#[cfg(test)]
pub(crate) mod testing;
