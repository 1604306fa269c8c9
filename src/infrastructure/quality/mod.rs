//! Quality gate - metric computation and publish decision

mod gate;
pub mod text;

pub use gate::QualityGate;
pub use text::{human_likeness_score, strip_markup, BANNED_PHRASES};

#[cfg(test)]
pub(crate) use gate::test_support::passing_article;
