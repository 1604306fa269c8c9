//! Humanization pass - machine-authorship signature reduction

mod humanizer;
mod tables;

pub use humanizer::Humanizer;
pub use tables::{CONTRACTIONS, PHRASE_SWAPS};
