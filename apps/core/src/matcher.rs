use serde::{Deserialize, Serialize};

/// Which subsequence matcher the finder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// Separator-aware match with the consecutive-run heuristic.
    #[default]
    Strict,
    /// Plain case-insensitive subsequence, accepts any complete match.
    Legacy,
}

impl MatcherKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "legacy" | "simple" => Some(Self::Legacy),
            _ => None,
        }
    }

    pub fn matches(self, pattern: &str, text: &str) -> Option<Vec<usize>> {
        match self {
            Self::Strict => fuzzy_match(pattern, text),
            Self::Legacy => subsequence_match(pattern, text),
        }
    }
}

/// Case-insensitive ordered subsequence match.
///
/// Returns the char indices of `text` that consumed the pattern, or `None`.
/// Spaces in the pattern are ignored and `.`, `-`, `_` in the text only act
/// as soft separators. Patterns of three or more chars also need a run of
/// adjacent hits, which rejects matches scattered one char apart.
pub fn fuzzy_match(pattern: &str, text: &str) -> Option<Vec<usize>> {
    let pattern: Vec<char> = lower_chars(pattern).filter(|c| *c != ' ').collect();
    let text = lower_chars(text).map(|c| match c {
        '.' | '-' | '_' => ' ',
        other => other,
    });

    let positions = scan(&pattern, text)?;

    // The cursor starts at 0, so a first hit at index 1 already counts.
    let mut consecutive = 0usize;
    let mut last = 0usize;
    for &index in &positions {
        if index == last + 1 {
            consecutive += 1;
        }
        last = index;
    }

    let len = pattern.len();
    if len < 3 || consecutive * 4 > len || consecutive > 2 {
        Some(positions)
    } else {
        None
    }
}

pub fn subsequence_match(pattern: &str, text: &str) -> Option<Vec<usize>> {
    let pattern: Vec<char> = lower_chars(pattern).collect();
    scan(&pattern, lower_chars(text))
}

fn scan(pattern: &[char], text: impl Iterator<Item = char>) -> Option<Vec<usize>> {
    let mut positions = Vec::with_capacity(pattern.len());
    let mut next = 0;

    for (index, text_char) in text.enumerate() {
        if next == pattern.len() {
            break;
        }
        if pattern[next] == text_char {
            positions.push(index);
            next += 1;
        }
    }

    (next == pattern.len()).then_some(positions)
}

// One output char per input char so indices keep pointing into the original text.
fn lower_chars(input: &str) -> impl Iterator<Item = char> + '_ {
    input
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
}

#[cfg(test)]
mod tests {
    use super::{fuzzy_match, subsequence_match, MatcherKind};

    #[test]
    fn short_patterns_accept_any_subsequence() {
        assert_eq!(fuzzy_match("fb", "Facebook"), Some(vec![0, 4]));
    }

    #[test]
    fn rejects_when_pattern_is_not_consumed() {
        assert_eq!(fuzzy_match("xyz", "abcdefg"), None);
    }

    #[test]
    fn scattered_long_pattern_is_rejected() {
        // every hit is two chars apart, no adjacent pair at all
        assert_eq!(fuzzy_match("abc", "axbxcx"), None);
        assert_eq!(subsequence_match("abc", "axbxcx"), Some(vec![0, 2, 4]));
    }

    #[test]
    fn one_adjacent_pair_is_enough_for_short_patterns() {
        // 1 * 4 > 3
        assert_eq!(fuzzy_match("abc", "abxc"), Some(vec![0, 1, 3]));
    }

    #[test]
    fn long_patterns_need_proportional_runs() {
        // 8 chars: one adjacent pair is 1 > 2 false and 1 > 8/4 false
        assert_eq!(fuzzy_match("abcdefgh", "abxcxdxexfxgxh"), None);
        // three adjacent pairs pass the absolute threshold
        assert!(fuzzy_match("abcdefgh", "abcdxexfxgxh").is_some());
    }

    #[test]
    fn first_hit_at_index_one_follows_the_start() {
        assert_eq!(fuzzy_match("bxd", "abxd"), Some(vec![1, 2, 3]));
        assert_eq!(fuzzy_match("bzd", "abxzxd"), Some(vec![1, 3, 5]));
        assert_eq!(fuzzy_match("tbr", "atxbxr"), Some(vec![1, 3, 5]));
        // a first hit at index 0 has nothing before it
        assert_eq!(fuzzy_match("azd", "axzxd"), None);
        // nor does a first hit further in
        assert_eq!(fuzzy_match("bzd", "aabxzxd"), None);
    }

    #[test]
    fn pattern_spaces_are_ignored_and_separators_soften() {
        assert_eq!(fuzzy_match("my doc", "my-docs.txt"), Some(vec![0, 1, 3, 4, 5]));
        assert_eq!(fuzzy_match("a.b", "a.b"), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(fuzzy_match("GIT", "github"), Some(vec![0, 1, 2]));
    }

    #[test]
    fn empty_pattern_matches_with_no_indices() {
        assert_eq!(fuzzy_match("", "anything"), Some(Vec::new()));
        assert_eq!(fuzzy_match("   ", "anything"), Some(Vec::new()));
        assert_eq!(subsequence_match("", ""), Some(Vec::new()));
    }

    #[test]
    fn indices_count_chars_not_bytes() {
        assert_eq!(fuzzy_match("éb", "Ébène"), Some(vec![0, 1]));
    }

    #[test]
    fn kind_dispatches_and_parses() {
        assert_eq!(MatcherKind::parse("LEGACY"), Some(MatcherKind::Legacy));
        assert_eq!(MatcherKind::parse("nope"), None);
        assert_eq!(MatcherKind::Legacy.matches("ace", "abcde"), Some(vec![0, 2, 4]));
        assert_eq!(MatcherKind::Strict.matches("ace", "abcde"), None);
    }
}
