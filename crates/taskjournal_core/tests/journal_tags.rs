mod common;

use taskjournal_core::{EntityRef, RepoError, TagPatch, TagRef};

#[test]
fn tags_are_ordered_by_name() {
    let journal = common::seeded_journal();
    let names: Vec<String> = journal.tags().unwrap().into_iter().map(|tag| tag.name).collect();
    assert_eq!(
        names,
        ["@errands", "@home", "@phone", "home remodel 2020", "project", "work"]
    );
}

#[test]
fn get_tag_accepts_id_or_name() {
    let journal = common::seeded_journal();
    assert_eq!(journal.get_tag(1_i64).unwrap().unwrap().name, "@errands");
    assert_eq!(journal.get_tag("@phone").unwrap().unwrap().tag_id, 2);
    assert_eq!(journal.get_tag(TagRef::Id(5)).unwrap().unwrap().color, None);
    assert!(journal.get_tag(1000_i64).unwrap().is_none());
    assert!(journal.get_tag("nope").unwrap().is_none());
}

#[test]
fn add_tag_assigns_next_id() {
    let mut journal = common::seeded_journal();
    let tag_id = journal.add_tag("test", Some("#123456")).unwrap();

    assert_eq!(tag_id, 7);
    let tag = journal.get_tag(tag_id).unwrap().unwrap();
    assert_eq!(tag.name, "test");
    assert_eq!(tag.color.as_deref(), Some("#123456"));
}

#[test]
fn duplicate_tag_name_is_rejected() {
    let mut journal = common::seeded_journal();
    let err = journal.add_tag("@home", None).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(journal.tags().unwrap().len(), 6);
}

#[test]
fn update_tag_sets_and_clears_color() {
    let mut journal = common::seeded_journal();
    journal
        .update_tag(
            1,
            &TagPatch::new()
                .name("test_update")
                .color(Some("#000000".to_string())),
        )
        .unwrap();
    let tag = journal.get_tag(1_i64).unwrap().unwrap();
    assert_eq!(tag.name, "test_update");
    assert_eq!(tag.color.as_deref(), Some("#000000"));

    journal.update_tag(1, &TagPatch::new().color(None)).unwrap();
    let tag = journal.get_tag(1_i64).unwrap().unwrap();
    assert_eq!(tag.name, "test_update");
    assert_eq!(tag.color, None);

    // tasks see the renamed tag
    assert!(journal.get_task(2).unwrap().unwrap().tags.contains("test_update"));
}

#[test]
fn update_missing_tag_is_not_found() {
    let mut journal = common::seeded_journal();
    let err = journal
        .update_tag(1000, &TagPatch::new().name("ghost"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(EntityRef::Tag(1000))));
}

#[test]
fn delete_tag_unlinks_every_task() {
    let mut journal = common::seeded_journal();
    journal.delete_tag("@errands").unwrap();

    assert!(journal.get_tag("@errands").unwrap().is_none());
    for task in journal.get_tasks(&[2, 6, 7, 13, 14]).unwrap() {
        assert!(!task.tags.contains("@errands"), "task {}", task.task_id);
    }

    journal.delete_tag(4_i64).unwrap();
    assert!(journal.get_task(3).unwrap().unwrap().tags.iter().all(|tag| tag != "@home"));

    // unknown tags are ignored
    journal.delete_tag("ghost").unwrap();
}

#[test]
fn add_task_tag_creates_missing_tag_and_is_idempotent() {
    let mut journal = common::seeded_journal();
    let tag_id = journal.add_task_tag(1, "test").unwrap();
    assert_eq!(journal.add_task_tag(1, "test").unwrap(), tag_id);

    assert!(journal.get_task(1).unwrap().unwrap().tags.contains("test"));
    assert_eq!(journal.get_tag("test").unwrap().unwrap().tag_id, tag_id);

    let existing = journal.add_task_tag(5, "@home").unwrap();
    assert_eq!(existing, 4);
    assert_eq!(journal.tags().unwrap().len(), 7);
}

#[test]
fn add_task_tag_for_missing_task_rolls_back_tag_creation() {
    let mut journal = common::seeded_journal();
    let err = journal.add_task_tag(1000, "orphan").unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(journal.get_tag("orphan").unwrap().is_none());
}

#[test]
fn remove_task_tag_detaches_and_ignores_unknown_names() {
    let mut journal = common::seeded_journal();
    journal.remove_task_tag(2, "@errands").unwrap();
    assert!(!journal.get_task(2).unwrap().unwrap().tags.contains("@errands"));
    assert!(journal.get_tag("@errands").unwrap().is_some());

    journal.remove_task_tag(2, "never-existed").unwrap();
}
