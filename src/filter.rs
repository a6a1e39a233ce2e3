/// Returns true if `url` contains any blocklist entry as a substring.
///
/// This is deliberately not a host match: `"facebook.com"` also catches
/// `m.facebook.com` and mirrors that embed the domain in their path.
pub fn is_blocked<S: AsRef<str>>(url: &str, blocklist: &[S]) -> bool {
    blocklist.iter().any(|entry| url.contains(entry.as_ref()))
}

/// Domain substrings excluded from lead consideration.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    entries: Vec<String>,
}

impl Blocklist {
    /// Empty entries are dropped, they would match every url.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(Into::into)
            .filter(|e: &String| !e.is_empty())
            .collect();
        Blocklist { entries }
    }

    pub fn blocks(&self, url: &str) -> bool {
        is_blocked(url, &self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[test]
fn test_is_blocked_substring() {
    let blocklist = ["facebook.com", "yelp.com"];
    assert!(is_blocked("https://www.facebook.com/lawfirm", &blocklist));
    assert!(is_blocked("https://m.facebook.com/x", &blocklist));
    assert!(is_blocked("https://mirror.example/yelp.com/biz/1", &blocklist));
    assert!(!is_blocked("https://bostondui.com/", &blocklist));
}

#[test]
fn test_is_blocked_empty_blocklist() {
    let blocklist: [&str; 0] = [];
    assert!(!is_blocked("https://example.com", &blocklist));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocklist_matches_free_function() {
        let entries = vec!["youtube.com", "wikipedia.org", "justia.com"];
        let blocklist = Blocklist::new(entries.clone());
        let urls = [
            "https://www.youtube.com/watch?v=1",
            "https://en.wikipedia.org/wiki/Lawyer",
            "https://lawyers.justia.com/lawyer/jane",
            "https://janedoe-law.com/contact",
            "",
        ];
        for url in urls {
            assert_eq!(blocklist.blocks(url), is_blocked(url, &entries), "{url}");
        }
    }

    #[test]
    fn test_blocklist_drops_empty_entries() {
        let blocklist = Blocklist::new(["", "yelp.com"]);
        assert_eq!(blocklist.len(), 1);
        assert!(!blocklist.blocks("https://janedoe-law.com"));
        assert!(is_blocked("https://janedoe-law.com", &[""]));
    }
}
