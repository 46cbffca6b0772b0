use std::collections::HashSet;

/// Insertion-ordered set of strings.
///
/// Iteration order is the order of first insertion, so every list built on
/// it (actions, red flags) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    items: Vec<String>,
    index: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; returns false when it was already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.index.contains(&value) {
            return false;
        }
        self.index.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.insert(value);
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.extend(iter);
        set
    }
}

/// Trim, drop blanks and dedupe, keeping first occurrence order.
pub fn dedupe_trimmed<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    values
        .into_iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<OrderedSet>()
        .into_vec()
}
