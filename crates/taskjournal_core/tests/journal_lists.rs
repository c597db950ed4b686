mod common;

use taskjournal_core::{EntityRef, Journal, ListPatch, ListView, RepoError};

#[test]
fn lists_are_ordered_by_position() {
    let journal = common::seeded_journal();
    let names: Vec<String> = journal
        .lists()
        .unwrap()
        .into_iter()
        .map(|list| list.name)
        .collect();
    assert_eq!(
        names,
        ["Focus", "Inbox", "Next", "Waiting", "Scheduled", "Someday/Maybe"]
    );
}

#[test]
fn get_list_returns_none_for_unknown_id() {
    let journal = common::seeded_journal();
    assert_eq!(journal.get_list(4).unwrap().unwrap().name, "Waiting");
    assert!(journal.get_list(1000).unwrap().is_none());
}

#[test]
fn get_lists_skips_missing_ids() {
    let journal = common::seeded_journal();
    let lists = journal.get_lists(&[2, 1, 1000]).unwrap();
    let names: Vec<&str> = lists.iter().map(|list| list.name.as_str()).collect();
    assert_eq!(names, ["Focus", "Inbox"]);
    assert!(journal.get_lists(&[]).unwrap().is_empty());
}

#[test]
fn add_list_appends_after_existing_lists() {
    let mut journal = common::seeded_journal();
    let list_id = journal.add_list("Testing", Some("testing")).unwrap();

    let list = journal.get_list(list_id).unwrap().unwrap();
    assert_eq!(list_id, 7);
    assert_eq!(list.name, "Testing");
    assert_eq!(list.icon.as_deref(), Some("testing"));
    assert_eq!(list.position, 7);
    assert_eq!(journal.lists().unwrap().last().unwrap().list_id, list_id);
}

#[test]
fn update_list_changes_only_given_fields() {
    let mut journal = common::seeded_journal();
    let list_id = journal.add_list("OldAndBusted", Some("test")).unwrap();

    journal
        .update_list(list_id, &ListPatch::new().name("NewHotness"))
        .unwrap();
    let list = journal.get_list(list_id).unwrap().unwrap();
    assert_eq!(list.name, "NewHotness");
    assert_eq!(list.icon.as_deref(), Some("test"));

    journal
        .update_list(list_id, &ListPatch::new().icon(None))
        .unwrap();
    let list = journal.get_list(list_id).unwrap().unwrap();
    assert_eq!(list.name, "NewHotness");
    assert_eq!(list.icon, None);
}

#[test]
fn update_missing_list_is_not_found() {
    let mut journal = common::seeded_journal();
    let err = journal
        .update_list(1000, &ListPatch::new().name("ghost"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(EntityRef::List(1000))));
}

#[test]
fn swap_list_positions_exchanges_positions() {
    let mut journal = common::seeded_journal();
    let third = journal.get_list(3).unwrap().unwrap().position;
    let fifth = journal.get_list(5).unwrap().unwrap().position;
    let positions_before = list_positions(&journal);

    assert!(journal.swap_list_positions(3, 5).unwrap());
    assert_eq!(journal.get_list(3).unwrap().unwrap().position, fifth);
    assert_eq!(journal.get_list(5).unwrap().unwrap().position, third);
    let positions_after = list_positions(&journal);
    assert_eq!(positions_after, positions_before);
    assert_eq!(positions_after, [1, 2, 3, 4, 5, 6]);

    let before = journal.lists().unwrap();
    assert!(!journal.swap_list_positions(3, 1000).unwrap());
    assert!(!journal.swap_list_positions(2, 2).unwrap());
    assert_eq!(journal.lists().unwrap(), before);
}

/// Sorted positions of every list.
fn list_positions(journal: &Journal) -> Vec<i64> {
    let mut positions: Vec<i64> = journal
        .lists()
        .unwrap()
        .iter()
        .map(|list| list.position)
        .collect();
    positions.sort_unstable();
    positions
}

#[test]
fn delete_list_drops_memberships_but_keeps_tasks() {
    let mut journal = common::seeded_journal();
    journal.delete_list(3).unwrap();

    assert!(journal.get_list(3).unwrap().is_none());
    let task = journal.get_task(1).unwrap().unwrap();
    assert_eq!(task.lists.into_iter().collect::<Vec<_>>(), [1]);
    assert!(journal.get_task(2).unwrap().unwrap().lists.is_empty());
}

#[test]
fn membership_add_is_idempotent_and_remove_detaches() {
    let mut journal = common::seeded_journal();
    journal.add_task_to_list(1, 4).unwrap();
    journal.add_task_to_list(1, 4).unwrap();
    assert_eq!(
        journal.get_task(1).unwrap().unwrap().lists.into_iter().collect::<Vec<_>>(),
        [1, 3, 4]
    );

    journal.remove_task_from_list(1, 3).unwrap();
    assert_eq!(
        journal.get_task(1).unwrap().unwrap().lists.into_iter().collect::<Vec<_>>(),
        [1, 4]
    );
}

#[test]
fn membership_to_missing_list_is_rejected() {
    let mut journal = common::seeded_journal();
    let err = journal.add_task_to_list(1, 1000).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(journal.count(ListView::List(1000)).unwrap(), 0);
}
