//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/get/insert/update/delete over the `todos` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every value reaches SQL through a positional parameter.
//! - Updates only touch supplied columns and always refresh `updated`.
//! - `updated` is never written below `created`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::todo::{NewTodo, TodoId, TodoItem, TodoPatch};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_COLUMNS_SQL: &str = "id, title, due, position, completed, created, updated";

// SQLite has no millisecond `now`; derive it from the julian day.
const NOW_EPOCH_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000.0 AS INTEGER)";

const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "due",
    "position",
    "completed",
    "created",
    "updated",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "todo repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "todo repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "todo repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Creation-time ordering for list queries. Ties always break on ascending id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Interprets a caller-supplied order: `desc` in any case is descending,
    /// anything else (including absence) is ascending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Query options for listing todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    pub order: SortOrder,
    /// `None` lists todos regardless of completion.
    pub completed: Option<bool>,
}

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<TodoItem>>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<TodoItem>>;
    /// Inserts one row and returns it with store-assigned fields.
    fn insert_todo(&self, todo: &NewTodo) -> RepoResult<TodoItem>;
    /// Applies a patch. Returns `None` when no row has `id`.
    fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Option<TodoItem>>;
    /// Returns whether exactly one row was removed.
    fn delete_todo(&self, id: TodoId) -> RepoResult<bool>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` differs from the
    ///   latest migration.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema was
    ///   tampered with.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_todo_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_one(&self, sql: &str, values: Vec<Value>) -> RepoResult<Option<TodoItem>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_todo_row(row)?)),
            None => Ok(None),
        }
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<TodoItem>> {
        let mut sql = format!("SELECT {TODO_COLUMNS_SQL} FROM todos");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(completed) = query.completed {
            sql.push_str(" WHERE completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }
        sql.push_str(&format!(
            " ORDER BY created {}, id ASC;",
            query.order.as_sql()
        ));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<TodoItem>> {
        self.query_one(
            &format!("SELECT {TODO_COLUMNS_SQL} FROM todos WHERE id = ?1;"),
            vec![Value::Integer(id)],
        )
    }

    fn insert_todo(&self, todo: &NewTodo) -> RepoResult<TodoItem> {
        let mut columns = vec!["title"];
        let mut bind_values = vec![Value::Text(todo.title.clone())];

        if let Some(due) = &todo.due {
            columns.push("due");
            bind_values.push(Value::Text(due.clone()));
        }
        if let Some(position) = todo.position {
            columns.push("position");
            bind_values.push(Value::Integer(position));
        }

        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO todos ({}) VALUES ({placeholders}) RETURNING {TODO_COLUMNS_SQL};",
            columns.join(", ")
        );

        self.query_one(&sql, bind_values)?
            .ok_or_else(|| RepoError::InvalidData("insert returned no row".to_string()))
    }

    fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Option<TodoItem>> {
        let mut assignments: Vec<String> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        let mut assign = |column: &str, value: Value| {
            bind_values.push(value);
            assignments.push(format!("{column} = ?{}", bind_values.len()));
        };
        if let Some(title) = &patch.title {
            assign("title", Value::Text(title.clone()));
        }
        if let Some(due) = &patch.due {
            assign("due", Value::Text(due.clone()));
        }
        if let Some(position) = patch.position {
            assign("position", Value::Integer(position));
        }
        if let Some(completed) = patch.completed {
            assign("completed", Value::Integer(bool_to_int(completed)));
        }
        assignments.push(format!("updated = MAX(created, {NOW_EPOCH_MS_SQL})"));
        bind_values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE todos SET {} WHERE id = ?{} RETURNING {TODO_COLUMNS_SQL};",
            assignments.join(", "),
            bind_values.len()
        );
        self.query_one(&sql, bind_values)
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id])?;
        Ok(changed == 1)
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<TodoItem> {
    let id: TodoId = row.get("id")?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed for id {id}"
            )));
        }
    };

    let position: Option<i64> = row.get("position")?;
    if let Some(value) = position.filter(|value| *value < 0) {
        return Err(RepoError::InvalidData(format!(
            "negative position `{value}` in todos.position for id {id}"
        )));
    }

    Ok(TodoItem {
        id,
        title: row.get("title")?,
        due: row.get("due")?,
        position,
        completed,
        created: row.get("created")?,
        updated: row.get("updated")?,
    })
}

fn ensure_todo_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "todos")? {
        return Err(RepoError::MissingRequiredTable("todos"));
    }
    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "todos", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "todos",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

#[cfg(test)]
mod tests {
    use super::SortOrder;

    #[test]
    fn sort_order_accepts_desc_in_any_case() {
        assert_eq!(SortOrder::from_param(Some("DeSc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("desc")), SortOrder::Desc);
    }

    #[test]
    fn sort_order_defaults_to_ascending() {
        assert_eq!(SortOrder::from_param(None), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("descending")), SortOrder::Asc);
    }
}
