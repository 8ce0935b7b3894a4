//! Property tests for the task list state transitions.

use proptest::prelude::*;
use tasklist_common::{view, AddOutcome, Body, TaskList, DEFAULT_SEED};

fn blank() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec![' ', '\t', '\n', '\r']), 0..8)
        .prop_map(|chars| chars.into_iter().collect())
}

fn non_blank() -> impl Strategy<Value = String> {
    ".*[^\\s].*".prop_filter("must contain a non-whitespace char", |s| !s.trim().is_empty())
}

proptest! {
    #[test]
    fn adding_non_blank_text_appends_it_untrimmed(s in non_blank()) {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        let before: Vec<_> = list.tasks().to_vec();
        list.set_draft(s.clone());

        let outcome = list.submit_draft();

        prop_assert!(outcome.is_added());
        prop_assert_eq!(list.count(), before.len() + 1);
        prop_assert_eq!(&list.tasks()[..before.len()], &before[..]);
        prop_assert_eq!(&list.tasks().last().unwrap().text, &s);
        prop_assert_eq!(list.draft(), "");
    }

    #[test]
    fn adding_blank_text_changes_nothing(s in blank()) {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        let before = list.snapshot();

        let outcome = list.add_task(&s);

        prop_assert_eq!(outcome, AddOutcome::Ignored);
        prop_assert_eq!(list.snapshot(), before);
    }

    #[test]
    fn deleting_existing_id_removes_only_that_task(
        extra in prop::collection::vec(non_blank(), 0..6),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        for text in &extra {
            list.add_task(text);
        }
        let before: Vec<_> = list.tasks().to_vec();
        let target = before[pick.index(before.len())].id;

        prop_assert!(list.delete_task(target));

        let expected: Vec<_> = before.into_iter().filter(|t| t.id != target).collect();
        prop_assert_eq!(list.tasks(), &expected[..]);
    }

    #[test]
    fn ids_stay_unique(ops in prop::collection::vec((any::<bool>(), non_blank()), 0..24)) {
        let mut list = TaskList::seeded(DEFAULT_SEED);
        for (delete, text) in ops {
            if delete {
                if let Some(id) = list.tasks().first().map(|t| t.id) {
                    list.delete_task(id);
                }
            } else {
                list.add_task(&text);
            }
            let mut ids: Vec<_> = list.tasks().iter().map(|t| t.id).collect();
            let len = ids.len();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), len);

            let page = view(&list.snapshot());
            prop_assert_eq!(page.is_empty(), list.count() == 0);
            match page.body {
                Body::Rows { rows } => prop_assert_eq!(rows.len(), list.count()),
                Body::Empty { .. } => prop_assert_eq!(list.count(), 0),
            }
        }
    }
}

#[test]
fn deleting_unknown_id_is_noop() {
    let mut list = TaskList::seeded(DEFAULT_SEED);
    let gone = list.tasks()[1].id;
    list.delete_task(gone);
    let before = list.snapshot();

    assert!(!list.delete_task(gone));
    assert_eq!(list.snapshot(), before);
}
