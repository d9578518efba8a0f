use serde::Deserialize;
use std::collections::HashSet;

/// Handling of two nodes that end up with the same identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Identifiers are kept verbatim; tree validation rejects duplicates
    #[default]
    Fail,
    /// Repeats get `-2`, `-3`, ... in the order they are assigned
    Suffix,
}

/// Hands out node identifiers according to a [`CollisionPolicy`]
///
/// Assignment order follows crawl order, so suffixes are stable for
/// identical page content.
#[derive(Debug, Default)]
pub struct IdRegistry {
    policy: CollisionPolicy,
    seen: HashSet<String>,
}

impl IdRegistry {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            seen: HashSet::new(),
        }
    }

    /// Returns the identifier to use for `candidate`
    pub fn assign(&mut self, candidate: String) -> String {
        match self.policy {
            CollisionPolicy::Fail => {
                self.seen.insert(candidate.clone());
                candidate
            }
            CollisionPolicy::Suffix => {
                if self.seen.insert(candidate.clone()) {
                    return candidate;
                }

                let mut n = 2;
                loop {
                    let alternative = format!("{}-{}", candidate, n);
                    if self.seen.insert(alternative.clone()) {
                        tracing::debug!(
                            "Identifier {} already taken, using {}",
                            candidate,
                            alternative
                        );
                        return alternative;
                    }
                    n += 1;
                }
            }
        }
    }

    /// Number of distinct identifiers handed out so far
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
