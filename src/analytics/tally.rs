use indexmap::IndexMap;
use serde::Serialize;

/// A name with its occurrence count, the result of a max-reduction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leader {
    pub name: String,
    pub count: usize,
}

impl Leader {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Fold `(name, count)` pairs into the one with the highest count.
///
/// Starts from `seed` with a count of zero and only replaces the running maximum on a
/// strictly greater count, so the earliest of several tied names wins.
pub fn max_by_count<'a, I>(items: I, seed: &str) -> Leader
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let mut best: Option<(&str, usize)> = None;
    let mut best_count = 0;
    for (name, count) in items {
        if count > best_count {
            best = Some((name, count));
            best_count = count;
        }
    }

    match best {
        Some((name, count)) => Leader::new(name, count),
        None => Leader::new(seed, 0),
    }
}

/// Insertion-ordered key -> count histogram
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tally(IndexMap<String, usize>);

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: &str) {
        match self.0.get_mut(key) {
            Some(count) => *count += 1,
            None => {
                self.0.insert(key.to_string(), 1);
            }
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys with their counts, in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.0.iter().map(|(key, count)| (key.as_str(), *count))
    }

    pub fn leader(&self, seed: &str) -> Leader {
        max_by_count(self.iter(), seed)
    }
}
