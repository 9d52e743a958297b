//! Row types, kept separate from the wire types in recipebox-types so the
//! store never depends on the HTTP layer.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
}

/// A recipe joined with its owner.
#[derive(Debug, Clone)]
pub struct RecipeRow {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i64,
    pub created_at: String,
    pub owner: UserRow,
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub bio: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

pub struct NewRecipe<'a> {
    pub title: &'a str,
    pub instructions: &'a str,
    pub minutes_to_complete: i64,
}
