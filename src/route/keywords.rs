/// First configured keyword (in list order) found in title + abstract, case-insensitive.
pub fn match_keyword<'k>(title: &str, abstract_text: &str, keywords: &'k [String]) -> Option<&'k str> {
    if keywords.is_empty() { return None; }
    let haystack = format!("{} {}", title, abstract_text).to_lowercase();
    keywords
        .iter()
        .find(|kw| !kw.is_empty() && haystack.contains(&kw.to_lowercase()))
        .map(|kw| kw.as_str())
}
