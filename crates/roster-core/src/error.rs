use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,
    #[error("email required")]
    EmailRequired,
    #[error("email already exists: {0}")]
    DuplicateEmail(String),
}
