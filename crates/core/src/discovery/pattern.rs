//! Shell-style file patterns.

use regex_lite::Regex;
use std::path::{Component, Path};

use super::error::DiscoveryError;

/// A compiled glob pattern.
///
/// Supports `*` and `?` (never crossing `/`), `**` (any number of
/// directories) and `[...]` classes with `!` or `^` negation. Patterns are
/// matched against the path relative to the discovery root using `/` as the
/// separator, and matching is case-sensitive.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
    max_depth: usize,
}

impl GlobPattern {
    /// Compiles `pattern`.
    ///
    /// In recursive mode the pattern may match at any depth below the root,
    /// like `rglob`; otherwise it is anchored at the root.
    pub fn compile(pattern: &str, recursive: bool) -> Result<Self, DiscoveryError> {
        if pattern.is_empty() {
            return Err(DiscoveryError::invalid_pattern(pattern, "empty pattern"));
        }
        if pattern.starts_with('/') {
            return Err(DiscoveryError::invalid_pattern(
                pattern,
                "pattern must be relative to the root",
            ));
        }

        let body = translate(pattern)?;
        let anchored = if recursive {
            format!("^(?:.*/)?{}$", body)
        } else {
            format!("^{}$", body)
        };
        let regex = Regex::new(&anchored)
            .map_err(|e| DiscoveryError::invalid_pattern(pattern, e.to_string()))?;

        let max_depth = if recursive || pattern.contains("**") {
            usize::MAX
        } else {
            pattern.split('/').filter(|s| !s.is_empty()).count()
        };

        Ok(Self {
            source: pattern.to_string(),
            regex,
            max_depth,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Deepest directory level a match can live at.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether `relative` (a path below the root) matches.
    pub fn matches(&self, relative: &Path) -> bool {
        let joined = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        self.regex.is_match(&joined)
    }
}

fn translate(pattern: &str) -> Result<String, DiscoveryError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                if chars.get(i + 1) == Some(&'/') {
                    i += 1;
                    out.push_str("(?:.*/)?");
                } else {
                    out.push_str(".*");
                }
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let (class, next) = translate_class(pattern, &chars, i)?;
                out.push_str(&class);
                i = next;
            }
            c => out.push_str(&regex_lite::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    Ok(out)
}

/// Translates the class opening at `start`, returning it and the index of
/// its closing bracket.
fn translate_class(
    pattern: &str,
    chars: &[char],
    start: usize,
) -> Result<(String, usize), DiscoveryError> {
    let mut i = start + 1;
    let mut class = String::from("[");

    if matches!(chars.get(i), Some('!') | Some('^')) {
        class.push('^');
        i += 1;
    }

    let first = i;
    loop {
        match chars.get(i) {
            None => {
                return Err(DiscoveryError::invalid_pattern(
                    pattern,
                    "unterminated character class",
                ))
            }
            // A leading ']' is a literal member.
            Some(']') if i > first => break,
            Some(&c) if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') => {
                class.push('\\');
                class.push(c);
            }
            Some('/') => {
                return Err(DiscoveryError::invalid_pattern(
                    pattern,
                    "character class cannot contain '/'",
                ))
            }
            Some(&c) => class.push(c),
        }
        i += 1;
    }

    class.push(']');
    Ok((class, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(pattern: &str) -> GlobPattern {
        GlobPattern::compile(pattern, false).unwrap()
    }

    fn deep(pattern: &str) -> GlobPattern {
        GlobPattern::compile(pattern, true).unwrap()
    }

    #[test]
    fn test_star_matches_extension() {
        let pattern = flat("*.wav");
        assert!(pattern.matches(Path::new("track01.wav")));
        assert!(pattern.matches(Path::new(".hidden.wav")));
        assert!(!pattern.matches(Path::new("track01.wav.bak")));
        assert!(!pattern.matches(Path::new("sub/track01.wav")));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!flat("*.wav").matches(Path::new("LOUD.WAV")));
    }

    #[test]
    fn test_recursive_matches_any_depth() {
        let pattern = deep("*.flac");
        assert!(pattern.matches(Path::new("a.flac")));
        assert!(pattern.matches(Path::new("disc1/a.flac")));
        assert!(pattern.matches(Path::new("disc1/extra/a.flac")));
        assert!(!pattern.matches(Path::new("disc1/a.wav")));
        assert_eq!(pattern.max_depth(), usize::MAX);
    }

    #[test]
    fn test_question_mark_and_classes() {
        let pattern = flat("track0?.[wW][!x]v");
        assert!(pattern.matches(Path::new("track01.wav")));
        assert!(pattern.matches(Path::new("track02.Wav")));
        assert!(!pattern.matches(Path::new("track01.wxv")));
        assert!(!pattern.matches(Path::new("track10.wav")));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = flat("Big Buck Bunny (S01E0?).ac3");
        assert!(pattern.matches(Path::new("Big Buck Bunny (S01E01).ac3")));
        assert!(!pattern.matches(Path::new("Big Buck Bunny S01E01.ac3")));
    }

    #[test]
    fn test_nested_pattern_depth() {
        let pattern = flat("disc*/*.wav");
        assert_eq!(pattern.max_depth(), 2);
        assert!(pattern.matches(Path::new("disc1/a.wav")));
        assert!(!pattern.matches(Path::new("a.wav")));
    }

    #[test]
    fn test_double_star() {
        let pattern = flat("**/*.w64");
        assert!(pattern.matches(Path::new("a.w64")));
        assert!(pattern.matches(Path::new("x/y/a.w64")));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(GlobPattern::compile("", false).is_err());
        assert!(GlobPattern::compile("[abc", false).is_err());
        assert!(GlobPattern::compile("/abs/*.wav", false).is_err());
    }
}
