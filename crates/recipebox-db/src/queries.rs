use crate::Database;
use crate::error::WriteError;
use crate::models::{NewRecipe, NewUser, RecipeRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

const USER_COLUMNS: &str = "id, username, password_hash, bio, image_url, created_at";

const RECIPE_SELECT: &str = "
    SELECT r.id, r.title, r.instructions, r.minutes_to_complete, r.created_at,
           u.id, u.username, u.password_hash, u.bio, u.image_url, u.created_at
    FROM recipes r
    JOIN users u ON u.id = r.user_id";

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &NewUser<'_>) -> Result<UserRow, WriteError> {
        self.with_tx(|tx| {
            tx.execute(
                "INSERT INTO users (username, password_hash, bio, image_url) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![user.username, user.password_hash, user.bio, user.image_url],
            )?;
            let id = tx.last_insert_rowid();
            tx.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                [id],
                |row| user_from_row(row, 0),
            )
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                    [username],
                    |row| user_from_row(row, 0),
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                    [id],
                    |row| user_from_row(row, 0),
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn count_users_named(&self, username: &str) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM users WHERE username = ?1",
                [username],
                |r| r.get(0),
            )?)
        })
    }

    // -- Recipes --

    /// Insert a recipe owned by `owner_id` and read it back joined with its owner.
    pub fn create_recipe(&self, owner_id: i64, recipe: &NewRecipe<'_>) -> Result<RecipeRow, WriteError> {
        self.with_tx(|tx| {
            tx.execute(
                "INSERT INTO recipes (title, instructions, minutes_to_complete, user_id) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![recipe.title, recipe.instructions, recipe.minutes_to_complete, owner_id],
            )?;
            let id = tx.last_insert_rowid();
            tx.query_row(&format!("{RECIPE_SELECT} WHERE r.id = ?1"), [id], recipe_from_row)
        })
    }

    /// Every recipe in the store, oldest first.
    pub fn list_recipes(&self) -> Result<Vec<RecipeRow>> {
        self.with_conn(query_recipes)
    }

    pub fn count_recipes(&self) -> Result<i64> {
        self.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM recipes", [], |r| r.get(0))?))
    }
}

fn query_recipes(conn: &Connection) -> Result<Vec<RecipeRow>> {
    let mut stmt = conn.prepare(&format!("{RECIPE_SELECT} ORDER BY r.id"))?;
    let rows = stmt
        .query_map([], recipe_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn user_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(offset)?,
        username: row.get(offset + 1)?,
        password_hash: row.get(offset + 2)?,
        bio: row.get(offset + 3)?,
        image_url: row.get(offset + 4)?,
        created_at: row.get(offset + 5)?,
    })
}

fn recipe_from_row(row: &Row<'_>) -> rusqlite::Result<RecipeRow> {
    Ok(RecipeRow {
        id: row.get(0)?,
        title: row.get(1)?,
        instructions: row.get(2)?,
        minutes_to_complete: row.get(3)?,
        created_at: row.get(4)?,
        owner: user_from_row(row, 5)?,
    })
}
