use std::cmp::Ordering;

/// Ключ с регистронезависимым порядком (ASCII, сравнение в верхнем регистре).
///
/// Используется как ключ индекса имён колонок: `"Name"`, `"NAME"` и
/// `"name"` — один и тот же ключ. Исходное написание сохраняется.
#[derive(Debug, Clone)]
pub struct NoCaseKey(String);

impl NoCaseKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Лексикографическое сравнение без учёта регистра.
pub fn cmp_nocase(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_uppercase())
        .cmp(b.bytes().map(|c| c.to_ascii_uppercase()))
}

impl Ord for NoCaseKey {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_nocase(&self.0, &other.0)
    }
}

impl PartialOrd for NoCaseKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NoCaseKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NoCaseKey {}

impl From<&str> for NoCaseKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn ordering_ignores_ascii_case() {
        assert_eq!(cmp_nocase("abc", "ABC"), Ordering::Equal);
        assert_eq!(cmp_nocase("abc", "ABD"), Ordering::Less);
        assert_eq!(cmp_nocase("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(cmp_nocase("ab", "ABC"), Ordering::Less);
    }

    #[test]
    fn keys_collide_in_map() {
        let mut map = BTreeMap::new();
        map.insert(NoCaseKey::new("Name"), 1);
        map.insert(NoCaseKey::new("NAME"), 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&NoCaseKey::new("name")), Some(&2));
    }

    #[test]
    fn original_spelling_is_kept() {
        assert_eq!(NoCaseKey::new("MiXeD").as_str(), "MiXeD");
    }
}
