// services/message_rules.rs

//! Pure first-message rules, shared by every validator in the crate.
//!
//! The conversation gate and the profile-answer preflight both enforce a
//! 20-word minimum; routing them through the same functions keeps the
//! client-side policy from drifting between call sites. The backend is
//! the authority and re-validates every mutation with the same rules.

use crate::models::message::RespondablePrompt;

/// Inclusive minimum word count for a conversation-opening message and
/// for profile prompt answers.
pub const FIRST_MESSAGE_MIN_WORDS: usize = 20;

/// Counts words by splitting on runs of whitespace. Leading/trailing
/// whitespace never produces tokens, so the count is trim-insensitive.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

pub fn meets_word_floor(text: &str) -> bool {
    word_count(text) >= FIRST_MESSAGE_MIN_WORDS
}

/// Whether a prompt index is present in the given prompt pool.
pub fn prompt_is_listed(prompts: &[RespondablePrompt], question_index: usize) -> bool {
    prompts.iter().any(|p| p.question_index == question_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(question_index: usize) -> RespondablePrompt {
        RespondablePrompt {
            question_index,
            question: "What matters most to you?".to_string(),
            answer: "Honesty.".to_string(),
        }
    }

    #[test]
    fn word_count_is_trim_insensitive() {
        let text = "  two words \t ";
        assert_eq!(word_count(text), 2);
        assert_eq!(word_count(text), word_count(text.trim()));
    }

    #[test]
    fn word_count_of_empty_and_blank_is_zero() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t"), 0);
        assert!(is_blank("   \n\t"));
    }

    #[test]
    fn word_count_collapses_whitespace_runs() {
        assert_eq!(word_count("a  b\tc\nd"), 4);
    }

    #[test]
    fn floor_is_inclusive_at_twenty() {
        let nineteen = vec!["w"; 19].join(" ");
        let twenty = vec!["w"; 20].join(" ");
        assert!(!meets_word_floor(&nineteen));
        assert!(meets_word_floor(&twenty));
    }

    #[test]
    fn prompt_lookup_matches_on_index() {
        let prompts = vec![prompt(2), prompt(5)];
        assert!(prompt_is_listed(&prompts, 2));
        assert!(!prompt_is_listed(&prompts, 3));
    }
}
