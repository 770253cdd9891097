//! crates/notes_hub_core/src/browse.rs
//!
//! Read-only views over the store: the student's filtered, searchable list
//! and the teacher's management list. Both group notes by subject.

use crate::domain::Note;
use crate::store::NoteStore;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteFilter {
    #[default]
    All,
    Bookmarked,
}

/// Notes sharing one subject, in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectGroup<'a> {
    pub subject: &'a str,
    pub notes: Vec<&'a Note>,
}

/// What to show instead of groups when nothing is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub headline: &'static str,
    pub hint: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowseView<'a> {
    pub total: usize,
    /// Sorted by subject.
    pub groups: Vec<SubjectGroup<'a>>,
    /// Set exactly when `total` is zero.
    pub empty: Option<EmptyState>,
}

/// The student's list: `filter` combined with a case-insensitive substring
/// search over title and subject.
pub fn student_view<'a>(store: &'a NoteStore, filter: NoteFilter, query: &str) -> BrowseView<'a> {
    let needle = query.to_lowercase();
    let matching: Vec<&Note> = store
        .notes()
        .iter()
        .filter(|note| filter == NoteFilter::All || note.is_bookmarked)
        .filter(|note| {
            note.title.to_lowercase().contains(&needle)
                || note.subject.to_lowercase().contains(&needle)
        })
        .collect();

    let empty = matching.is_empty().then(|| {
        let headline = if query.is_empty() {
            "No notes found."
        } else {
            "No notes match your search."
        };
        let hint = if filter == NoteFilter::Bookmarked && query.is_empty() {
            "You have not bookmarked any notes yet."
        } else {
            "Try adjusting your filters or search term."
        };
        EmptyState {
            headline,
            hint: Some(hint),
        }
    });

    BrowseView {
        total: matching.len(),
        groups: group_by_subject(matching),
        empty,
    }
}

/// The teacher's list: every note, grouped.
pub fn teacher_view(store: &NoteStore) -> BrowseView<'_> {
    let empty = store.is_empty().then_some(EmptyState {
        headline: "No notes have been uploaded yet.",
        hint: None,
    });

    BrowseView {
        total: store.len(),
        groups: group_by_subject(store.notes().iter().collect()),
        empty,
    }
}

fn group_by_subject(notes: Vec<&Note>) -> Vec<SubjectGroup<'_>> {
    let mut grouped: BTreeMap<&str, Vec<&Note>> = BTreeMap::new();
    for note in notes {
        grouped.entry(note.subject.as_str()).or_default().push(note);
    }
    let mut groups: Vec<SubjectGroup<'_>> = grouped
        .into_iter()
        .map(|(subject, notes)| SubjectGroup { subject, notes })
        .collect();
    // Case-insensitive order, exact spelling breaks ties.
    groups.sort_by_cached_key(|group| (group.subject.to_lowercase(), group.subject));
    groups
}
