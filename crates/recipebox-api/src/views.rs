use recipebox_db::models::{RecipeRow, UserRow};
use recipebox_types::api::{RecipeResponse, UserResponse};

pub(crate) fn user_response(row: UserRow) -> UserResponse {
    UserResponse {
        id: row.id,
        username: row.username,
        bio: row.bio,
        image_url: row.image_url,
    }
}

pub(crate) fn recipe_response(row: RecipeRow) -> RecipeResponse {
    RecipeResponse {
        id: row.id,
        title: row.title,
        instructions: row.instructions,
        minutes_to_complete: row.minutes_to_complete,
        user: user_response(row.owner),
    }
}
