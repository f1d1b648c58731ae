pub mod author;
pub mod book;
pub mod query;
pub mod user;

pub use author::{
    Author, AuthorChanges, AuthorCreateDto, AuthorDetailsDto, AuthorReadOnlyDto, AuthorUpdateDto,
};
pub use book::{Book, BookChanges, BookCreateDto, BookDetailsDto, BookReadOnlyDto, BookUpdateDto};
pub use query::{QueryParameters, VirtualizeResponse};
pub use user::{NewUser, Role, User, UserResponse};
