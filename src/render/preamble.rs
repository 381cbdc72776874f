use std::sync::LazyLock;

use regex::Regex;

const UNKNOWN_TYPE: &str = "Unknown";

static PREAMBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)arXiv:(\S+)\s+Announce Type:\s+(.*?)\s+Abstract:\s+(.*)").expect("valid regex")
});

/// Announcement parts pulled out of a cleaned summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub paper_type: String,
    pub abstract_text: String,
}

impl Announcement {
    pub fn is_new(&self) -> bool {
        self.paper_type.to_lowercase().contains("new")
    }
}

/// Parse `arXiv:<id> Announce Type: <type> Abstract: <text>`.
/// Unmatched input yields type "Unknown" with the whole text as abstract.
pub fn parse_announcement(clean: &str) -> Announcement {
    match PREAMBLE_RE.captures(clean) {
        Some(caps) => Announcement {
            paper_type: caps.get(2).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
            abstract_text: caps.get(3).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        },
        None => Announcement {
            paper_type: UNKNOWN_TYPE.to_string(),
            abstract_text: clean.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_preamble() {
        let a = parse_announcement("arXiv:2401.00001 Announce Type: new  Abstract: Foo bar baz");
        assert_eq!(a.paper_type, "new");
        assert_eq!(a.abstract_text, "Foo bar baz");
        assert!(a.is_new());
    }

    #[test]
    fn handles_compound_types_and_case() {
        let a = parse_announcement("ARXIV:2401.00002v2 announce type: replace-cross abstract: Revised text.");
        assert_eq!(a.paper_type, "replace-cross");
        assert_eq!(a.abstract_text, "Revised text.");
        assert!(!a.is_new());
    }

    #[test]
    fn falls_back_when_preamble_missing() {
        let a = parse_announcement("Just an abstract without header");
        assert_eq!(a.paper_type, "Unknown");
        assert_eq!(a.abstract_text, "Just an abstract without header");
        assert!(!a.is_new());
    }
}
