//! User persistence. Deleting a user cascades to calendars, events and reminders.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::user::User;

pub struct UserService<'a> {
    conn: &'a Connection,
}

impl<'a> UserService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, mut user: User) -> Result<User> {
        user.validate().map_err(|e| anyhow!(e))?;

        self.conn
            .execute(
                "INSERT INTO users (name, email) VALUES (?1, ?2)",
                params![user.name, user.email],
            )
            .context("Failed to insert user")?;

        user.id = Some(self.conn.last_insert_rowid());
        Ok(user)
    }

    pub fn get(&self, id: i64) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1",
                [id],
                map_user_row,
            )
            .optional()
            .context("Failed to load user")
    }

    pub fn list_all(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email FROM users ORDER BY id ASC")?;
        let users = stmt
            .query_map([], map_user_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", [id])
            .context("Failed to delete user")?;

        if rows_affected == 0 {
            return Err(anyhow!("User with id {} not found", id));
        }
        Ok(())
    }
}

fn map_user_row(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;

    #[test]
    fn test_create_and_get_user() {
        let db = Database::open_initialized(":memory:").unwrap();
        let service = UserService::new(db.connection());

        let created = service
            .create(User {
                email: Some("ada@example.com".to_string()),
                ..User::new("Ada")
            })
            .unwrap();
        let loaded = service.get(created.id.unwrap()).unwrap().unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn test_create_rejects_invalid_user() {
        let db = Database::open_initialized(":memory:").unwrap();
        let service = UserService::new(db.connection());
        assert!(service.create(User::new(" ")).is_err());
    }

    #[test]
    fn test_delete_missing_user() {
        let db = Database::open_initialized(":memory:").unwrap();
        let service = UserService::new(db.connection());
        assert!(service.delete(42).is_err());
    }
}
