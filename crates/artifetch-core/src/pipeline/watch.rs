//! URLs whose successful download triggers a `callback-on` event.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSet(HashSet<String>);

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.contains(url)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for WatchSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for WatchSet {
    fn from(url: &str) -> Self {
        std::iter::once(url).collect()
    }
}

impl From<String> for WatchSet {
    fn from(url: String) -> Self {
        std::iter::once(url).collect()
    }
}

impl From<Vec<String>> for WatchSet {
    fn from(urls: Vec<String>) -> Self {
        urls.into_iter().collect()
    }
}

impl From<&[&str]> for WatchSet {
    fn from(urls: &[&str]) -> Self {
        urls.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_url_and_collection_normalize_the_same() {
        let one = WatchSet::from("http://x/recovery.img");
        let many = WatchSet::from(vec!["http://x/recovery.img".to_string()]);
        assert_eq!(one, many);
        assert!(one.contains("http://x/recovery.img"));
        assert!(!one.contains("http://x/boot.img"));
    }

    #[test]
    fn duplicates_collapse() {
        let set: WatchSet = ["a", "b", "a"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(WatchSet::new().is_empty());
    }
}
