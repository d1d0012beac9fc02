//! Normalizes raw strategy output into a validated, directional signal run.
//!
//! Stages run in order: validate, infer missing directions, enforce the
//! contract, then reverse and score.

pub mod alignment;
pub mod confidence;
pub mod direction;
pub mod enforcer;
pub mod pipeline;
pub mod processor;
pub mod validator;
#[cfg(test)]
mod tests;

pub use alignment::align_to_bars;
pub use confidence::score_confidence;
pub use direction::{detect_direction, infer_direction, DetectionRule};
pub use enforcer::enforce;
pub use pipeline::{PipelineOptions, SignalPipeline};
pub use processor::{process, process_with_options, reverse_directions, ProcessOptions};
pub use validator::{validate, ValidationReport};
