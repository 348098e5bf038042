use std::collections::BTreeSet;

/// Collects `@handle` mentions from note text.
///
/// A mention starts at the beginning of the text or after whitespace or an
/// opening bracket, and runs over ASCII alphanumerics, `_`, `-` and `.`.
/// Trailing dots are dropped so sentence punctuation is not captured.
/// Handles are lowercased.
pub fn extract_mentions(content: &str) -> BTreeSet<String> {
    let mut mentions = BTreeSet::new();
    let mut prev: Option<char> = None;
    let mut chars = content.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let at_boundary = prev.is_none_or(|p| p.is_whitespace() || matches!(p, '(' | '['));
        if ch == '@' && at_boundary {
            let start = idx + ch.len_utf8();
            let mut end = start;
            while let Some(&(next_idx, next)) = chars.peek() {
                if is_handle_char(next) {
                    end = next_idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let handle = content[start..end].trim_end_matches('.');
            if !handle.is_empty() {
                mentions.insert(handle.to_ascii_lowercase());
            }
            prev = content[..end].chars().next_back();
            continue;
        }
        prev = Some(ch);
    }

    mentions
}

fn is_handle_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_mentions_anywhere_in_text() {
        let found = extract_mentions("@alice please sync with @Bob.Smith and (@carol_1).");
        assert_eq!(found, set(&["alice", "bob.smith", "carol_1"]));
    }

    #[test]
    fn ignores_email_addresses_and_lone_at() {
        let found = extract_mentions("mail jane@example.com @ noon");
        assert!(found.is_empty());
    }

    #[test]
    fn duplicate_mentions_collapse() {
        assert_eq!(extract_mentions("@dan @dan @DAN"), set(&["dan"]));
    }
}
