//! Fixed substitution tables for the humanization pass

/// Banned phrase -> plainer alternatives, picked uniformly at random
pub const PHRASE_SWAPS: &[(&str, &[&str])] = &[
    ("delve into", &["dig into", "look at", "explore"]),
    ("in today's digital landscape", &["these days", "right now"]),
    ("it's important to note that", &["keep in mind that", "worth knowing:"]),
    ("in conclusion", &["to wrap up", "all told"]),
    ("furthermore", &["also", "on top of that"]),
    ("moreover", &["besides", "also"]),
    ("leverage", &["use", "make use of"]),
    ("seamlessly", &["smoothly", "without fuss"]),
    ("game-changer", &["big deal", "real improvement"]),
    ("unlock the potential", &["get the most out"]),
    ("in the realm of", &["in", "when it comes to"]),
    ("a testament to", &["proof of"]),
    ("ever-evolving", &["always changing", "shifting"]),
    ("dive deep", &["dig in", "go deep"]),
    ("harness the power", &["put it to work"]),
    ("robust solution", &["solid option"]),
    ("elevate your", &["improve your", "lift your"]),
    ("navigating the complexities", &["working through the details"]),
];

/// Formal phrasing -> whole-word contraction, applied with probability 0.7
pub const CONTRACTIONS: &[(&str, &str)] = &[
    ("do not", "don't"),
    ("does not", "doesn't"),
    ("did not", "didn't"),
    ("cannot", "can't"),
    ("will not", "won't"),
    ("would not", "wouldn't"),
    ("should not", "shouldn't"),
    ("could not", "couldn't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("was not", "wasn't"),
    ("were not", "weren't"),
    ("have not", "haven't"),
    ("has not", "hasn't"),
    ("it is", "it's"),
    ("that is", "that's"),
    ("there is", "there's"),
    ("you are", "you're"),
    ("you will", "you'll"),
    ("we are", "we're"),
    ("they are", "they're"),
];

/// Coordinating connectors for sentence-rhythm variation
pub const CONNECTORS: &[&str] = &["And", "But", "So"];

/// Persona openers injected (bolded) after every third second-level heading
pub const OPENERS: &[&str] = &[
    "Here's the thing.",
    "Real talk.",
    "Quick story.",
    "Let me be straight with you.",
    "From experience, this part matters.",
];

/// Rhetorical questions for strategic imperfection
pub const RHETORICAL_QUESTIONS: &[&str] = &[
    "Sound familiar?",
    "Ever wondered why?",
    "What's the catch?",
    "Seems obvious, right?",
];

/// Formal -> conversational swaps applied globally and deterministically
pub const CONVERSATIONAL_SWAPS: &[(&str, &str)] = &[
    ("utilize", "use"),
    ("utilizes", "uses"),
    ("commence", "start"),
    ("subsequently", "later"),
    ("individuals", "people"),
    ("approximately", "about"),
    ("numerous", "many"),
    ("facilitate", "help"),
    ("endeavor", "try"),
    ("prior to", "before"),
];

#[cfg(test)]
mod tests {
    use crate::infrastructure::quality::BANNED_PHRASES;

    use super::*;

    #[test]
    fn test_every_swap_key_is_a_banned_phrase() {
        for (phrase, alternatives) in PHRASE_SWAPS {
            assert!(
                BANNED_PHRASES.contains(phrase),
                "swap key '{}' is not in the banned phrase list",
                phrase
            );
            assert!(!alternatives.is_empty());
        }
    }

    #[test]
    fn test_alternatives_are_not_themselves_banned() {
        for (_, alternatives) in PHRASE_SWAPS {
            for alt in *alternatives {
                assert!(!BANNED_PHRASES.contains(alt), "'{}' is banned", alt);
            }
        }
    }
}
