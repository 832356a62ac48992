//! Text utilities shared by the completion and hover layers.

pub mod text_utils;

pub use text_utils::{current_word, prior_word, word_range_at};
