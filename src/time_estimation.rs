//! Time estimation for quiz generation.
//!
//! Gives the UI a rough "this will take N-M seconds" range from the size of
//! the extracted text and the number of questions requested. Not a
//! scheduling contract: nothing waits on these numbers.

use serde::Serialize;

// ═══════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════

/// Fixed overhead for request setup and model warm-up (seconds).
const BASE_MIN_SECS: f64 = 15.0;
const BASE_MAX_SECS: f64 = 25.0;

/// Seconds added per 10,000 characters of source text.
const PER_10K_CHARS_MIN_SECS: f64 = 5.0;
const PER_10K_CHARS_MAX_SECS: f64 = 8.0;

/// Seconds added per requested question.
const PER_QUESTION_MIN_SECS: f64 = 3.0;
const PER_QUESTION_MAX_SECS: f64 = 5.0;

/// Upper bound on either end of the range.
pub const MAX_ESTIMATE_SECS: u64 = 180;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Expected generation time range, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerationEstimate {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl GenerationEstimate {
    /// Progress-indicator text, e.g. "about 20-35 seconds".
    pub fn label(&self) -> String {
        if self.min_secs == self.max_secs {
            format!("about {} seconds", self.min_secs)
        } else {
            format!("about {}-{} seconds", self.min_secs, self.max_secs)
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Estimation
// ═══════════════════════════════════════════════════════════

/// Estimate quiz generation time.
///
/// Formula per bound: `base + per_10k * (chars / 10_000) + per_question * count`,
/// each clamped to [`MAX_ESTIMATE_SECS`].
pub fn estimate_generation_time(source_chars: usize, question_count: u32) -> GenerationEstimate {
    let size_units = source_chars as f64 / 10_000.0;
    let questions = f64::from(question_count);

    let min = BASE_MIN_SECS + PER_10K_CHARS_MIN_SECS * size_units + PER_QUESTION_MIN_SECS * questions;
    let max = BASE_MAX_SECS + PER_10K_CHARS_MAX_SECS * size_units + PER_QUESTION_MAX_SECS * questions;

    GenerationEstimate {
        min_secs: clamp_secs(min),
        max_secs: clamp_secs(max),
    }
}

fn clamp_secs(secs: f64) -> u64 {
    (secs.round() as u64).min(MAX_ESTIMATE_SECS)
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
