/// Where an entry goes, decided purely from its tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Detailed,
    /// Bucket key: the first tag that hit a digest category.
    Digest(String),
    Excluded,
}

/// Detailed membership wins over digest membership unconditionally.
pub fn classify(tags: &[String], detailed: &[String], digest: &[String]) -> Classification {
    if tags.iter().any(|t| detailed.contains(t)) {
        return Classification::Detailed;
    }
    match tags.iter().find(|t| digest.contains(t)) {
        Some(tag) => Classification::Digest(tag.clone()),
        None => Classification::Excluded,
    }
}
