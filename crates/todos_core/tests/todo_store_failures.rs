use std::cell::Cell;
use todos_core::db::open_db_in_memory;
use todos_core::{
    NewTodo, ReadOutcome, RepoError, RepoResult, SqliteTodoRepository, TodoId, TodoInput,
    TodoItem, TodoListQuery, TodoPatch, TodoRepository, TodoStore,
};

/// Repository whose store is unreachable; counts how often it was called.
#[derive(Default)]
struct UnreachableRepository {
    calls: Cell<usize>,
}

impl UnreachableRepository {
    fn fail<T>(&self) -> RepoResult<T> {
        self.calls.set(self.calls.get() + 1);
        Err(RepoError::InvalidData("store unreachable".to_string()))
    }
}

impl TodoRepository for &UnreachableRepository {
    fn list_todos(&self, _query: &TodoListQuery) -> RepoResult<Vec<TodoItem>> {
        self.fail()
    }

    fn get_todo(&self, _id: TodoId) -> RepoResult<Option<TodoItem>> {
        self.fail()
    }

    fn insert_todo(&self, _todo: &NewTodo) -> RepoResult<TodoItem> {
        self.fail()
    }

    fn update_todo(&self, _id: TodoId, _patch: &TodoPatch) -> RepoResult<Option<TodoItem>> {
        self.fail()
    }

    fn delete_todo(&self, _id: TodoId) -> RepoResult<bool> {
        self.fail()
    }
}

#[test]
fn store_failures_propagate_from_writes_and_lists() {
    let repo = UnreachableRepository::default();
    let store = TodoStore::new(&repo);

    assert!(store.list_todos(None, None).is_err());
    assert!(store
        .create_todo(&TodoInput::new().with_title("x"))
        .is_err());
    assert!(store
        .update_todo(1, &TodoInput::new().with_completed(true))
        .is_err());
    assert!(store.delete_todo(1).is_err());
    assert_eq!(repo.calls.get(), 4);
}

#[test]
fn read_reports_store_failure_without_propagating() {
    let repo = UnreachableRepository::default();
    let store = TodoStore::new(&repo);

    let outcome = store.read_todo(1);
    assert!(outcome.is_store_error());
    assert!(matches!(
        outcome,
        ReadOutcome::StoreError(RepoError::InvalidData(_))
    ));
    assert!(store.read_todo(1).into_item().is_none());
}

#[test]
fn invalid_candidates_never_reach_the_store() {
    let repo = UnreachableRepository::default();
    let store = TodoStore::new(&repo);

    let created = store.create_todo(&TodoInput::new()).unwrap();
    assert!(!created.success);

    let updated = store
        .update_todo(1, &TodoInput::new().with_position(-4))
        .unwrap();
    assert!(!updated.success);
    assert!(!updated.not_found);

    assert_eq!(repo.calls.get(), 0);
}

#[test]
fn read_degrades_when_table_disappears() {
    let conn = open_db_in_memory().unwrap();
    let store = TodoStore::new(SqliteTodoRepository::try_new(&conn).unwrap());
    conn.execute_batch("DROP TABLE todos;").unwrap();

    assert!(matches!(
        store.read_todo(1),
        ReadOutcome::StoreError(RepoError::Db(_))
    ));
    assert!(matches!(store.list_todos(None, None), Err(RepoError::Db(_))));
    assert!(store.delete_todo(1).is_err());
}
