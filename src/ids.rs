use std::collections::HashSet;

/// Hands out course ids that are unique across everything it has seen.
///
/// Seed it with every id already in the collection; the collision scan runs
/// against that whole set, not just ids minted in the current run.
#[derive(Debug, Default)]
pub struct IdentifierAllocator {
    taken: HashSet<String>,
}

impl IdentifierAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IdentifierAllocator {
            taken: ids.into_iter().map(Into::into).collect(),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Allocate and reserve an id for `name` / `number`.
    pub fn allocate(&mut self, name: &str, number: &str) -> String {
        let base = base_id(name, number);
        let id = if self.taken.contains(&base) {
            (1u32..)
                .map(|n| format!("{}_{:04}", base, n))
                .find(|candidate| !self.taken.contains(candidate))
                .unwrap_or_default()
        } else {
            base
        };
        self.taken.insert(id.clone());
        id
    }

    /// Reserve an id that came from elsewhere. Returns false if it was taken.
    pub fn reserve(&mut self, id: &str) -> bool {
        self.taken.insert(id.to_string())
    }
}

/// Deterministic id before collision handling.
pub fn base_id(name: &str, number: &str) -> String {
    let upper = name.to_uppercase();
    let words: Vec<String> = upper
        .split_whitespace()
        .map(alnum)
        .filter(|w| !w.is_empty())
        .collect();

    let stem = if upper.starts_with("AP ") {
        format!("AP_{}", words.get(1).map(String::as_str).unwrap_or("COURSE"))
    } else if upper.contains("HONORS") {
        let subject = words
            .iter()
            .find(|w| w.as_str() != "HONORS")
            .map(String::as_str)
            .unwrap_or("COURSE");
        format!("HON_{}", subject)
    } else if words.is_empty() {
        "COURSE".to_string()
    } else {
        words.iter().take(2).cloned().collect::<Vec<_>>().join("_")
    };

    let prefix: String = alnum(number).chars().take(4).collect();
    if prefix.is_empty() {
        stem
    } else {
        format!("{}_{}", stem, prefix)
    }
}

fn alnum(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_id_shapes() {
        assert_eq!(base_id("AP Biology 1-2", "001599"), "AP_BIOLOGY_0015");
        assert_eq!(base_id("CHEMISTRY HONORS", "001901"), "HON_CHEMISTRY_0019");
        assert_eq!(base_id("HONORS ENGLISH 3-4", "005201"), "HON_ENGLISH_0052");
        assert_eq!(base_id("SPANISH 3-4", "000403"), "SPANISH_34_0004");
        assert_eq!(base_id("L/ENGLISH 3-4", "005501"), "LENGLISH_34_0055");
        assert_eq!(base_id("YEARBOOK", ""), "YEARBOOK");
        assert_eq!(base_id("!!!", "12"), "COURSE_12");
    }

    #[test]
    fn allocator_never_reuses_an_existing_id() {
        let mut ids = IdentifierAllocator::with_existing(["AP_BIO_0015"]);
        let id = ids.allocate("AP Biology 1-2", "001599");
        assert_ne!(id, "AP_BIO_0015");
        assert!(ids.contains("AP_BIO_0015"));
        assert!(ids.contains(&id));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn collisions_get_counter_suffixes() {
        let mut ids = IdentifierAllocator::with_existing(["AP_BIOLOGY_0015"]);
        assert_eq!(ids.allocate("AP BIOLOGY 1-2", "001599"), "AP_BIOLOGY_0015_0001");
        assert_eq!(ids.allocate("AP BIOLOGY 3-4", "001520"), "AP_BIOLOGY_0015_0002");
    }

    #[test]
    fn counter_skips_suffixes_already_taken() {
        let mut ids = IdentifierAllocator::with_existing(["SPANISH_34_0004", "SPANISH_34_0004_0001"]);
        assert_eq!(ids.allocate("SPANISH 3-4", "000403"), "SPANISH_34_0004_0002");
    }

    #[test]
    fn reserve_reports_collisions() {
        let mut ids = IdentifierAllocator::new();
        assert!(ids.reserve("X_1"));
        assert!(!ids.reserve("X_1"));
        assert_eq!(ids.allocate("X", "1"), "X_1_0001");
    }
}
