//! Cosmetic header greeting and the cursor speech bubble.

use serde::{Deserialize, Serialize};

/// Words cycled through in the cursor speech bubble.
pub const ADJECTIVES: [&str; 8] = [
    "Empathetic",
    "Analytical",
    "Observant",
    "Adaptive",
    "Collaborative",
    "Experimental",
    "Reflective",
    "Impactful",
];

/// Time between adjective changes.
pub const CYCLE_INTERVAL_MS: f64 = 8500.0;
/// Fade-out time before the word is swapped.
pub const SWAP_DELAY_MS: f64 = 500.0;
/// Delay before the bubble first appears.
pub const INITIAL_FADE_IN_MS: f64 = 1000.0;

/// Greeting for a local hour of the day (0-23).
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        6..=11 => "🌞 Good morning",
        12..=15 => "☀️ Good afternoon",
        16..=19 => "🌇 Good evening",
        _ => "🌙 Aren't you a night owl?",
    }
}

/// Speech bubble visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BubbleState {
    /// Not shown yet.
    Hidden,
    /// Fading out ahead of a word change.
    FadingOut,
    /// Shown (fading in or fully visible).
    Visible,
}

/// What the bubble shows at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bubble {
    pub word: &'static str,
    pub state: BubbleState,
}

/// The bubble contents `elapsed_ms` after the page initialised.
///
/// Every [`CYCLE_INTERVAL_MS`] the bubble fades out, and [`SWAP_DELAY_MS`]
/// later it fades back in with the next adjective.
pub fn bubble_at(elapsed_ms: f64) -> Bubble {
    let elapsed = elapsed_ms.max(0.0);
    let cycles = (elapsed / CYCLE_INTERVAL_MS).floor() as usize;
    if cycles == 0 {
        let state = if elapsed < INITIAL_FADE_IN_MS {
            BubbleState::Hidden
        } else {
            BubbleState::Visible
        };
        return Bubble {
            word: ADJECTIVES[0],
            state,
        };
    }

    let phase = elapsed - cycles as f64 * CYCLE_INTERVAL_MS;
    if phase < SWAP_DELAY_MS {
        Bubble {
            word: ADJECTIVES[(cycles - 1) % ADJECTIVES.len()],
            state: BubbleState::FadingOut,
        }
    } else {
        Bubble {
            word: ADJECTIVES[cycles % ADJECTIVES.len()],
            state: BubbleState::Visible,
        }
    }
}
