//! Platelens vision library
//!
//! Client for the generative vision model plus the defensive pipeline that
//! turns its free-text reply into a validated food analysis: markdown fence
//! stripping, JSON parsing, and shape validation. The model is asked for
//! strictly-JSON output but nothing enforces that, so every reply is treated
//! as untrusted text until it passes validation.

pub mod analysis;
pub mod claude;
pub mod extract;
pub mod traits;

pub use analysis::{AnalysisError, AnalysisResult, FoodItem, FOOD_ANALYSIS_PROMPT};
pub use claude::ClaudeVision;
pub use extract::strip_code_fence;
pub use traits::{VisionError, VisionModel};
