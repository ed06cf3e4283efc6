//! Simple-regex prefix extraction.
//!
//! A left-anchored regex without alternation matches only strings that
//! start with its literal prefix, so it can be answered by scanning
//! `[prefix, successor(prefix))`. Everything else scans the whole string
//! bracket and re-checks.

use super::tightness::Tightness;
use crate::interval::{BoundInclusion, Interval};
use crate::key::{max_for_type, min_for_type, BsonType, Value};
use crate::matcher::RegexMatch;

/// Best-effort check for an alternation `|` that is not escaped.
///
/// Never misses a real alternation, but reports some harmless pipes (inside
/// a character class or `\Q...\E`) too.
pub fn string_may_have_unescaped_pipe(s: &str) -> bool {
    let b = s.as_bytes();
    if !b.is_empty() && b[0] == b'|' {
        return true;
    }
    if b.len() > 1 && b[1] == b'|' && b[0] != b'\\' {
        return true;
    }
    for i in 2..b.len() {
        let probe = b[i];
        let prev = b[i - 1];
        let tail = b[i - 2];
        // A pipe after an escaped backslash is live again.
        if probe == b'|' && (prev != b'\\' || tail == b'\\') {
            return true;
        }
    }
    false
}

/// PCRE metacharacters that end the literal prefix.
const METACHARS: &[char] = &['^', '$', '.', '[', '(', ')', '+', '{'];

/// Extract the literal prefix of a simple regex.
///
/// Returns the prefix (empty if the regex cannot use a prefix scan) and
/// how precisely `[prefix, successor(prefix))` represents the regex.
pub fn simple_regex(pattern: &str, flags: &str, collated: bool) -> (String, Tightness) {
    if collated {
        // Collation keys are not in code point order.
        return (String::new(), Tightness::InexactFetch);
    }

    let not_simple = (String::new(), Tightness::InexactCovered);

    let (multiline_ok, rest) = if let Some(rest) = pattern.strip_prefix("\\A") {
        (true, rest)
    } else if let Some(rest) = pattern.strip_prefix('^') {
        (false, rest)
    } else {
        return not_simple;
    };

    if string_may_have_unescaped_pipe(rest) {
        return not_simple;
    }

    let mut extended = false;
    for flag in flags.chars() {
        match flag {
            // `^` matches after every newline in multiline mode; `\A` does not.
            'm' if multiline_ok => {}
            'm' => return not_simple,
            's' => {}
            'x' => extended = true,
            _ => return not_simple,
        }
    }

    let chars: Vec<char> = rest.chars().collect();
    let mut pos = 0;
    let mut literal = String::new();

    while pos < chars.len() {
        let c = chars[pos];
        pos += 1;

        if c == '*' || c == '?' {
            // The previous character is optional.
            literal.pop();
            return (literal, Tightness::InexactCovered);
        } else if c == '\\' {
            let Some(&escaped) = chars.get(pos) else {
                break;
            };
            pos += 1;
            if escaped == 'Q' {
                while pos < chars.len() {
                    let q = chars[pos];
                    pos += 1;
                    if q == '\\' && chars.get(pos) == Some(&'E') {
                        pos += 1;
                        break;
                    }
                    literal.push(q);
                }
            } else if escaped.is_ascii_alphanumeric() {
                // Character classes and other escapes we cannot reason about.
                break;
            } else {
                literal.push(escaped);
            }
        } else if METACHARS.contains(&c) {
            if !multiline_ok && c == '.' && chars.get(pos) == Some(&'*') && pos + 1 == chars.len()
            {
                // /^abc.*/ matches exactly the strings starting with "abc".
                return (literal, Tightness::Exact);
            }
            break;
        } else if extended && c == '#' {
            break;
        } else if extended && c.is_ascii_whitespace() {
            continue;
        } else {
            literal.push(c);
        }
    }

    // A fully literal pattern keeps the covered classification: only the
    // trailing `.*` form is promoted to exact.
    (literal, Tightness::InexactCovered)
}

/// Smallest string greater than every string starting with `prefix`.
///
/// Returns `None` when no such string exists (the prefix is all U+10FFFF).
pub fn prefix_successor(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        let next = match last {
            '\u{D7FF}' => Some('\u{E000}'),
            c => char::from_u32(c as u32 + 1),
        };
        if let Some(next) = next {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

/// Bounds for a regex predicate: the prefix range (or the whole string
/// bracket) followed by the regex value itself, since regexes are stored
/// and compared as values too.
pub fn translate_regex(regex: &RegexMatch, collated: bool) -> (Vec<Interval>, Tightness) {
    let (prefix, tightness) = simple_regex(&regex.pattern, &regex.flags, collated);

    let range = if prefix.is_empty() {
        Interval::range(
            min_for_type(BsonType::String),
            max_for_type(BsonType::String),
            BoundInclusion::IncludeStartOnly,
        )
    } else {
        let end = match prefix_successor(&prefix) {
            Some(s) => Value::String(s),
            None => max_for_type(BsonType::String),
        };
        Interval::range(Value::String(prefix), end, BoundInclusion::IncludeStartOnly)
    };

    (vec![range, Interval::point(regex.as_value())], tightness)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(pattern: &str, flags: &str) -> (String, Tightness) {
        simple_regex(pattern, flags, false)
    }

    #[test]
    fn test_anchored_prefix() {
        assert_eq!(simple("^ab", ""), ("ab".into(), Tightness::InexactCovered));
        assert_eq!(simple("^ab.*", ""), ("ab".into(), Tightness::Exact));
        assert_eq!(simple("^ab.", ""), ("ab".into(), Tightness::InexactCovered));
        assert_eq!(simple("^abc[0-9]", ""), ("abc".into(), Tightness::InexactCovered));
    }

    #[test]
    fn test_unanchored_not_simple() {
        assert_eq!(simple("ab", ""), (String::new(), Tightness::InexactCovered));
        assert_eq!(simple("a|b", ""), (String::new(), Tightness::InexactCovered));
    }

    #[test]
    fn test_alternation_not_simple() {
        assert_eq!(simple("^a|b", ""), (String::new(), Tightness::InexactCovered));
        assert_eq!(simple("^ab\\\\|c", ""), (String::new(), Tightness::InexactCovered));
        // Escaped pipe is literal.
        assert_eq!(simple("^a\\|b", ""), ("a|b".into(), Tightness::InexactCovered));
    }

    #[test]
    fn test_pipe_detector_is_conservative() {
        assert!(string_may_have_unescaped_pipe("|"));
        assert!(string_may_have_unescaped_pipe("a|"));
        assert!(string_may_have_unescaped_pipe("ab\\\\|"));
        assert!(!string_may_have_unescaped_pipe("\\|"));
        assert!(!string_may_have_unescaped_pipe("ab\\|"));
        // Harmless inside a class, but still reported.
        assert!(string_may_have_unescaped_pipe("[|]"));
    }

    #[test]
    fn test_quantifiers_drop_last_char() {
        assert_eq!(simple("^abc*", ""), ("ab".into(), Tightness::InexactCovered));
        assert_eq!(simple("^a?", ""), (String::new(), Tightness::InexactCovered));
    }

    #[test]
    fn test_flags() {
        assert_eq!(simple("^ab", "m"), (String::new(), Tightness::InexactCovered));
        assert_eq!(simple("\\Aab", "m"), ("ab".into(), Tightness::InexactCovered));
        assert_eq!(simple("^ab", "s"), ("ab".into(), Tightness::InexactCovered));
        assert_eq!(simple("^ab", "i"), (String::new(), Tightness::InexactCovered));
        assert_eq!(simple("^a b", "x"), ("ab".into(), Tightness::InexactCovered));
        assert_eq!(simple("^ab#c", "x"), ("ab".into(), Tightness::InexactCovered));
    }

    #[test]
    fn test_multiline_anchor_dot_star_not_exact() {
        assert_eq!(simple("\\Aab.*", ""), ("ab".into(), Tightness::InexactCovered));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(simple("^a\\.b", ""), ("a.b".into(), Tightness::InexactCovered));
        assert_eq!(simple("^a\\db", ""), ("a".into(), Tightness::InexactCovered));
        assert_eq!(simple("^\\Qa.b\\E", ""), ("a.b".into(), Tightness::InexactCovered));
        assert_eq!(simple("^\\Qa.b\\Ec+", ""), ("a.bc".into(), Tightness::InexactCovered));
    }

    #[test]
    fn test_collated_is_fetch() {
        assert_eq!(
            simple_regex("^ab", "", true),
            (String::new(), Tightness::InexactFetch)
        );
    }

    #[test]
    fn test_prefix_successor() {
        assert_eq!(prefix_successor("ab").as_deref(), Some("ac"));
        assert_eq!(prefix_successor("a\u{D7FF}").as_deref(), Some("a\u{E000}"));
        assert_eq!(prefix_successor("a\u{10FFFF}").as_deref(), Some("b"));
        assert_eq!(prefix_successor("\u{10FFFF}"), None);
    }

    #[test]
    fn test_translate_regex() {
        let (intervals, tightness) = translate_regex(&RegexMatch::new("^ab", ""), false);
        assert_eq!(tightness, Tightness::InexactCovered);
        assert_eq!(
            intervals,
            vec![
                Interval::range(
                    Value::string("ab"),
                    Value::string("ac"),
                    BoundInclusion::IncludeStartOnly,
                ),
                Interval::point(Value::regex("^ab", "")),
            ]
        );

        let (intervals, _) = translate_regex(&RegexMatch::new("a|b", ""), false);
        assert_eq!(intervals[0].start, Value::string(""));
        assert_eq!(intervals[0].end, Value::Object(vec![]));
        assert!(!intervals[0].end_inclusive);
    }
}
