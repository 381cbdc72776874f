use crate::feed::FeedEntry;
use crate::render::format_digest_line;

pub const DIGEST_HEADER: &str = "<b>🗞️ Daily Digest (Other Categories)</b>\n";

pub fn category_header(category: &str) -> String {
    format!("\n<b>📂 {}</b>\n", crate::render::escape_html(category))
}

/// Entries held back for the digest, grouped by category in first-seen order.
#[derive(Debug, Default)]
pub struct DigestBuffer<'a> {
    buckets: Vec<(String, Vec<&'a FeedEntry>)>,
}

impl<'a> DigestBuffer<'a> {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, category: &str, entry: &'a FeedEntry) {
        match self.buckets.iter_mut().find(|(c, _)| c == category) {
            Some((_, entries)) => entries.push(entry),
            None => self.buckets.push((category.to_string(), vec![entry])),
        }
    }

    pub fn is_empty(&self) -> bool { self.buckets.is_empty() }

    pub fn len(&self) -> usize { self.buckets.iter().map(|(_, e)| e.len()).sum() }

    pub fn categories(&self) -> impl Iterator<Item = (&str, usize)> {
        self.buckets.iter().map(|(c, e)| (c.as_str(), e.len()))
    }

    /// Header, then per category a category header and one line per entry.
    pub fn fragments(&self) -> Vec<String> {
        let mut out = vec![DIGEST_HEADER.to_string()];
        for (category, entries) in &self.buckets {
            out.push(category_header(category));
            out.extend(entries.iter().map(|e| format_digest_line(e)));
        }
        out
    }

    /// Drain into packed messages; the buffer is empty afterwards.
    pub fn drain_packed(&mut self, max_len: usize) -> Vec<String> {
        if self.is_empty() { return Vec::new(); }
        let messages = pack(&self.fragments(), max_len);
        self.buckets.clear();
        messages
    }
}

/// Greedy left-to-right packing. A fragment longer than `max_len` on its
/// own still becomes a single (oversized) message.
pub fn pack(fragments: &[String], max_len: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for frag in fragments {
        let frag_len = frag.chars().count();
        if current_len + frag_len > max_len && !current.is_empty() {
            out.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(frag);
        current_len += frag_len;
    }
    if !current.is_empty() { out.push(current); }
    out
}
