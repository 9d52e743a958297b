use serde::{Deserialize, Serialize};

use crate::validation::{Checker, ValidationErrors};

pub const USERNAME_MAX_CHARS: usize = 64;
pub const INSTRUCTIONS_MIN_CHARS: usize = 50;

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SignupRequest {
    /// The name as stored: surrounding whitespace is not part of it.
    pub fn username(&self) -> &str {
        self.username.trim()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let username = self.username();
        Checker::default()
            .check(!username.is_empty(), "Username must be present")
            .check(
                username.chars().count() <= USERNAME_MAX_CHARS,
                "Username must be at most 64 characters",
            )
            .check(!self.password.is_empty(), "Password must be present")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn username(&self) -> &str {
        self.username.trim()
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

// -- Recipes --

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i64,
}

impl CreateRecipeRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Checker::default()
            .check(!self.title.trim().is_empty(), "Title must be present")
            .check(
                self.instructions.chars().count() >= INSTRUCTIONS_MIN_CHARS,
                "Instructions must be at least 50 characters long",
            )
            .check(
                self.minutes_to_complete > 0,
                "Minutes to complete must be greater than 0",
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i64,
    pub user: UserResponse,
}

// -- Errors --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }
}
