use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::book::BookReadOnlyDto;

/// An author as stored in the `authors` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Payload for creating an author.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCreateDto {
    /// Required, at most 50 characters.
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    /// Required, at most 50 characters.
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    /// Optional, at most 250 characters.
    #[validate(length(max = 250))]
    pub bio: Option<String>,
}

/// Payload for replacing an author. `id` must match the id in the request path.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AuthorUpdateDto {
    pub id: i32,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(length(max = 250))]
    pub bio: Option<String>,
}

/// Author as returned by list and create endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorReadOnlyDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

/// Author together with the books attributed to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDetailsDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub books: Vec<BookReadOnlyDto>,
}

/// Fields written when inserting or updating an author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorChanges {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<Author> for AuthorReadOnlyDto {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            bio: author.bio,
        }
    }
}

impl AuthorDetailsDto {
    pub fn new(author: Author, books: Vec<BookReadOnlyDto>) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            bio: author.bio,
            books,
        }
    }
}

impl From<AuthorCreateDto> for AuthorChanges {
    fn from(dto: AuthorCreateDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            bio: dto.bio,
        }
    }
}

impl From<AuthorUpdateDto> for AuthorChanges {
    fn from(dto: AuthorUpdateDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            bio: dto.bio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_author_create_validation() {
        let valid = AuthorCreateDto {
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            bio: Some("Wrote Earthsea.".to_string()),
        };
        assert!(valid.validate().is_ok());

        let missing_first_name = AuthorCreateDto {
            first_name: "".to_string(),
            ..valid.clone()
        };
        assert!(missing_first_name.validate().is_err());

        let long_last_name = AuthorCreateDto {
            last_name: "x".repeat(51),
            ..valid.clone()
        };
        assert!(long_last_name.validate().is_err());

        let long_bio = AuthorCreateDto {
            bio: Some("b".repeat(251)),
            ..valid
        };
        assert!(long_bio.validate().is_err());
    }

    #[test]
    fn test_author_maps_to_read_only_dto() {
        let author = Author {
            id: 7,
            first_name: "Terry".to_string(),
            last_name: "Pratchett".to_string(),
            bio: None,
        };
        assert_eq!(author.full_name(), "Terry Pratchett");

        let dto = AuthorReadOnlyDto::from(author);
        assert_eq!(
            dto,
            AuthorReadOnlyDto {
                id: 7,
                first_name: "Terry".to_string(),
                last_name: "Pratchett".to_string(),
                bio: None,
            }
        );
    }

    #[test]
    fn test_author_dto_uses_camel_case() {
        let json = serde_json::json!({ "firstName": "Mary", "lastName": "Shelley" });
        let dto: AuthorCreateDto = serde_json::from_value(json).unwrap();
        assert_eq!(dto.first_name, "Mary");
        assert!(dto.bio.is_none());
    }
}
