use kanban_core::{BoardId, KanbanConfig, KanbanService, MemoryStore, PersistentStore, TaskId};

const LEGACY_TASKS: &str = r#"[
    {"id":"late","title":"Late","status":"Todo","boardId":"Todo","priority":"High","taskType":"Study","createdDate":"2025-01-09T10:00:00.000Z"},
    {"id":"early","title":"Early","status":"Todo","boardId":"Todo","priority":"Low","taskType":"Study","createdDate":"2025-01-02T10:00:00.000Z"},
    {"id":"drift","title":"Drift","status":"Done","boardId":"Todo","priority":"Low","taskType":"Work","order":0}
]"#;

fn legacy_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .put_raw("statusLabels", r#"["Todo","In Progress","Done"]"#)
        .unwrap();
    store.put_raw("tasks", LEGACY_TASKS).unwrap();
    store
}

fn order(service: &KanbanService<'_, MemoryStore>, id: &str) -> Option<u32> {
    service
        .tasks()
        .get(&TaskId::new(id))
        .unwrap()
        .unwrap()
        .order
}

#[test]
fn load_fills_missing_orders_by_creation_date() {
    let store = legacy_store();
    let service = KanbanService::new(&store, KanbanConfig::default());

    let report = service.load().unwrap();

    assert_eq!(report.boards, 3);
    assert_eq!(report.normalize.repaired_groups, vec!["Todo".to_string()]);
    assert_eq!(order(&service, "early"), Some(0));
    assert_eq!(order(&service, "late"), Some(1));
}

#[test]
fn load_relinks_drifted_board_ids() {
    let store = legacy_store();
    let service = KanbanService::new(&store, KanbanConfig::default());

    let report = service.load().unwrap();

    assert_eq!(report.normalize.relinked_tasks, 1);
    let drift = service.tasks().get(&TaskId::new("drift")).unwrap().unwrap();
    assert_eq!(drift.board_id.as_str(), "Done");
    assert_eq!(drift.order, Some(0));
}

#[test]
fn load_seeds_placeholders_only_for_empty_boards() {
    let store = legacy_store();
    let service = KanbanService::new(&store, KanbanConfig::default());

    let report = service.load().unwrap();

    assert_eq!(report.placeholders, vec![BoardId::new("In Progress")]);
    let column = service.tasks().list_by_status("In Progress").unwrap();
    assert_eq!(column.len(), 1);
    assert_eq!(column[0].title, "New Task");
    assert_eq!(column[0].task_type, "Study");
    assert_eq!(column[0].order, Some(0));
}

#[test]
fn second_load_writes_nothing() {
    let store = legacy_store();
    let service = KanbanService::new(&store, KanbanConfig::default());
    service.load().unwrap();
    let tasks_before = store.snapshot("tasks");
    let labels_before = store.snapshot("statusLabels");

    let report = service.load().unwrap();

    assert!(report.normalize.is_clean());
    assert!(report.placeholders.is_empty());
    assert_eq!(store.snapshot("tasks"), tasks_before);
    assert_eq!(store.snapshot("statusLabels"), labels_before);
}

#[test]
fn fresh_store_gets_default_boards_with_placeholders() {
    let store = MemoryStore::new();
    let service = KanbanService::new(&store, KanbanConfig::default());

    let report = service.load().unwrap();

    assert_eq!(report.placeholders.len(), 3);
    let view = service.board_view(&Default::default()).unwrap();
    let titles: Vec<&str> = view.iter().map(|column| column.board.title()).collect();
    assert_eq!(titles, vec!["Todo", "In Progress", "Done"]);
    assert!(view.iter().all(|column| column.tasks.len() == 1));
}

#[test]
fn corrupt_labels_fall_back_to_configured_defaults() {
    let store = MemoryStore::new();
    store.put_raw("statusLabels", "not json").unwrap();
    let config = KanbanConfig {
        default_boards: vec!["Backlog".to_string(), "Shipped".to_string()],
        done_board: "Shipped".to_string(),
        seed_placeholders: false,
        ..KanbanConfig::default()
    };
    let service = KanbanService::new(&store, config);

    let report = service.load().unwrap();

    assert_eq!(report.boards, 2);
    assert_eq!(
        store.snapshot("statusLabels").as_deref(),
        Some(r#"["Backlog","Shipped"]"#)
    );
}

#[test]
fn deleted_board_never_gets_a_placeholder_back() {
    let store = MemoryStore::new();
    let service = KanbanService::new(&store, KanbanConfig::default());
    service.load().unwrap();

    assert!(service.delete_board(&BoardId::new("Done")).unwrap());
    let report = service.load().unwrap();

    assert!(report.placeholders.is_empty());
    assert!(service.tasks().list_by_status("Done").unwrap().is_empty());
}

#[test]
fn create_board_seeds_one_placeholder() {
    let store = MemoryStore::new();
    let service = KanbanService::new(&store, KanbanConfig::default());
    service.load().unwrap();

    service.create_board("Review").unwrap();
    service.create_board(" Review ").unwrap();

    assert_eq!(service.tasks().list_by_status("Review").unwrap().len(), 1);
}

#[test]
fn one_undecodable_task_does_not_hide_the_rest() {
    let store = MemoryStore::new();
    store.put_raw("statusLabels", r#"["Todo","Done"]"#).unwrap();
    store
        .put_raw(
            "tasks",
            r#"[
                {"id":"keep","title":"Keep me","status":"Todo","boardId":"Todo","priority":"High","taskType":"Work","order":0},
                {"id":"odd","title":"Odd","status":"Todo","boardId":"Todo","priority":"Low","taskType":"Work","order":-1}
            ]"#,
        )
        .unwrap();
    let config = KanbanConfig {
        seed_placeholders: false,
        ..KanbanConfig::default()
    };
    let service = KanbanService::new(&store, config);

    let report = service.load().unwrap();

    assert!(report.normalize.is_clean());
    let todo = service.tasks().list_by_status("Todo").unwrap();
    assert_eq!(todo.len(), 1);
    assert_eq!(todo[0].id.as_str(), "keep");
    assert_eq!(todo[0].title, "Keep me");
    assert_eq!(order(&service, "keep"), Some(0));
    assert!(service.tasks().get(&TaskId::new("odd")).unwrap().is_none());
}
