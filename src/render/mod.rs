//! Turns feed entries into chat-ready HTML messages.

mod html;
mod preamble;

use crate::feed::FeedEntry;

pub use html::{clean_title, escape_html, strip_tags};
pub use preamble::{parse_announcement, Announcement};

const ELLIPSIS: &str = "...";
const NEW_GLYPH: &str = "🆕";
const REVISION_GLYPH: &str = "🔄";

/// `/abs/` → `/pdf/` plus a `.pdf` suffix.
pub fn pdf_link(abs_link: &str) -> String {
    format!("{}.pdf", abs_link.replace("/abs/", "/pdf/"))
}

/// Keep at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &text[..idx], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Cleaned announcement for an entry: tags stripped, newlines flattened, preamble parsed.
pub fn announcement(entry: &FeedEntry) -> Announcement {
    let flat = entry.summary.replace('\n', " ");
    let clean = strip_tags(&flat);
    parse_announcement(clean.trim())
}

/// Full message for one entry. `matched_keyword` adds the keyword-match line.
pub fn format_detailed(entry: &FeedEntry, max_len: usize, matched_keyword: Option<&str>) -> String {
    let title = clean_title(&entry.title);
    let authors = escape_html(&entry.author);

    let ann = announcement(entry);
    let summary = escape_html(&truncate_chars(&ann.abstract_text, max_len));

    let abs_link = &entry.link;
    let pdf = pdf_link(abs_link);

    let glyph = if ann.is_new() { NEW_GLYPH } else { REVISION_GLYPH };
    let type_label = format!("<code>[{}]</code>", escape_html(&ann.paper_type.to_uppercase()));
    let tags_label = format!("🏷 <code>{}</code>", escape_html(&entry.tags.join(", ")));
    let keyword_label = matched_keyword
        .map(|kw| format!("\n🎯 <b>Keyword Match:</b> <code>{}</code>", escape_html(kw)))
        .unwrap_or_default();

    format!(
        "<b>📄 {title}</b>\n\
         {glyph} {type_label} | {tags_label}{keyword_label}\n\n\
         <b>👥 Authors:</b> {authors}\n\n\
         <b>📝 Abstract:</b>\n{summary}\n\n\
         🔗 <a href='{pdf}'>PDF Download</a> | <a href='{abs_link}'>Abs Page</a>"
    )
}

/// Compact digest fragment: linked title, authors indented on the next line.
pub fn format_digest_line(entry: &FeedEntry) -> String {
    let title = clean_title(&entry.title);
    let authors = escape_html(&entry.author);
    let pdf = pdf_link(&entry.link);
    format!("🔹 <a href='{pdf}'>{title}</a>\n    <i>{authors}</i>\n")
}
