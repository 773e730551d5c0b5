//! Duplicate Detector
//!
//! Two entries denote the same catalog item when their titles match
//! case-insensitively, their years are equal and they share at least one
//! author (case-insensitive exact match). Typos are not caught.

use std::collections::HashSet;

use crate::resource::{Resource, ResourceFields};

/// Check whether `candidate` duplicates the stored `existing` resource.
#[must_use]
pub fn is_duplicate(candidate: &ResourceFields, existing: &Resource) -> bool {
    if candidate.year != existing.year {
        return false;
    }
    if candidate.title.to_lowercase() != existing.title.to_lowercase() {
        return false;
    }

    let authors: HashSet<String> = candidate.authors.iter().map(|a| a.to_lowercase()).collect();
    existing
        .authors
        .iter()
        .any(|author| authors.contains(&author.to_lowercase()))
}

/// Return the first stored resource `candidate` duplicates, if any.
#[must_use]
pub fn find_duplicate<'a>(candidate: &ResourceFields, existing: &'a [Resource]) -> Option<&'a Resource> {
    existing.iter().find(|resource| is_duplicate(candidate, resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored(id: &str, title: &str, authors: &[&str], year: i32) -> Resource {
        let fields = ResourceFields::new(title, authors.iter().map(ToString::to_string).collect(), year);
        Resource::create(id.to_string(), format!("{id}-v"), Utc::now(), fields)
    }

    fn candidate(title: &str, authors: &[&str], year: i32) -> ResourceFields {
        ResourceFields::new(title, authors.iter().map(ToString::to_string).collect(), year)
    }

    #[test]
    fn test_same_entry_case_insensitive() {
        let existing = stored("b1", "The Great Gatsby", &["F. Scott Fitzgerald"], 1925);
        let c = candidate("THE GREAT GATSBY", &["f. scott fitzgerald"], 1925);

        assert!(is_duplicate(&c, &existing));
    }

    #[test]
    fn test_one_shared_author_is_enough() {
        let existing = stored("b1", "Good Omens", &["Terry Pratchett", "Neil Gaiman"], 1990);
        let c = candidate("Good Omens", &["Neil Gaiman"], 1990);

        assert!(is_duplicate(&c, &existing));
    }

    #[test]
    fn test_no_shared_author() {
        let existing = stored("b1", "Poems", &["Emily Dickinson"], 1890);
        let c = candidate("Poems", &["Walt Whitman"], 1890);

        assert!(!is_duplicate(&c, &existing));
    }

    #[test]
    fn test_different_title_never_duplicate() {
        let existing = stored("b1", "Dune", &["Frank Herbert"], 1965);
        let c = candidate("Dune Messiah", &["Frank Herbert"], 1965);

        assert!(!is_duplicate(&c, &existing));
    }

    #[test]
    fn test_different_year_never_duplicate() {
        let existing = stored("b1", "Dune", &["Frank Herbert"], 1965);
        let c = candidate("Dune", &["Frank Herbert"], 1966);

        assert!(!is_duplicate(&c, &existing));
    }

    #[test]
    fn test_author_substring_is_not_a_match() {
        let existing = stored("b1", "Dune", &["Frank Herbert"], 1965);
        let c = candidate("Dune", &["Herbert"], 1965);

        assert!(!is_duplicate(&c, &existing));
    }

    #[test]
    fn test_empty_authors_never_duplicate() {
        let existing = stored("b1", "Anonymous Tales", &[], 1700);
        let c = candidate("Anonymous Tales", &[], 1700);

        assert!(!is_duplicate(&c, &existing));
    }

    #[test]
    fn test_find_duplicate_returns_match() {
        let existing = vec![
            stored("b1", "Dune", &["Frank Herbert"], 1965),
            stored("b2", "Emma", &["Jane Austen"], 1815),
        ];
        let c = candidate("emma", &["JANE AUSTEN"], 1815);

        assert_eq!(find_duplicate(&c, &existing).map(|r| r.id.as_str()), Some("b2"));
        assert!(find_duplicate(&candidate("Ulysses", &["James Joyce"], 1922), &existing).is_none());
    }
}
