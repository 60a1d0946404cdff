use crate::fs_ops::DirectoryEntry;

/// Indices of `entries` whose name contains `search`, in listing order.
///
/// Matching is a plain case-sensitive substring test; an empty search keeps everything.
pub fn filter(entries: &[DirectoryEntry], search: &str) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| search.is_empty() || entry.name.contains(search))
        .map(|(index, _)| index)
        .collect()
}

/// Characters that may be typed into the search buffer
pub fn is_search_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '_' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<DirectoryEntry> {
        names.iter().map(|n| DirectoryEntry::file(n)).collect()
    }

    #[test]
    fn test_empty_search_is_identity() {
        let list = entries(&["a.txt", "b.txt", "abc.txt"]);
        assert_eq!(filter(&list, ""), vec![0, 1, 2]);
    }

    #[test]
    fn test_substring_keeps_order() {
        let list = entries(&["a.txt", "b.txt", "abc.txt"]);
        assert_eq!(filter(&list, "a"), vec![0, 2]);
        assert_eq!(filter(&list, "bc"), vec![2]);
        assert_eq!(filter(&list, ".txt"), vec![0, 1, 2]);
        assert!(filter(&list, "zzz").is_empty());
    }

    #[test]
    fn test_case_sensitive() {
        let list = entries(&["README.md", "readme.txt"]);
        assert_eq!(filter(&list, "README"), vec![0]);
        assert_eq!(filter(&list, "readme"), vec![1]);
    }

    #[test]
    fn test_search_chars() {
        for c in ['a', 'Z', '7', '.', '_', '-'] {
            assert!(is_search_char(c), "{c}");
        }
        for c in [' ', '/', '*', '\t', '?'] {
            assert!(!is_search_char(c), "{c:?}");
        }
    }
}
