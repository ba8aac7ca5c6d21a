use roster_core::domain::{normalize_email, normalize_name, User, UserId};
use roster_core::error::ValidationError;
use std::collections::BTreeMap;

pub type Result<T> = std::result::Result<T, ValidationError>;

#[derive(Debug, Clone)]
pub struct UserNew {
    pub name: String,
    pub email: String,
}

/// In-memory registry of user records, append-only for the process
/// lifetime. Ids are handed out from a dedicated monotonic counter, never
/// derived from the record count, so ascending id order is creation order
/// and ids stay unique even if deletion is ever added.
#[derive(Debug, Default)]
pub struct Directory {
    users: BTreeMap<UserId, User>,
    next_id: i64,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory by running each entry through `create`, so seed
    /// data obeys the same validation and id assignment as runtime input.
    pub fn seeded<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = UserNew>,
    {
        let mut directory = Self::new();
        for entry in entries {
            directory.create(entry)?;
        }
        Ok(directory)
    }

    /// Lookup by id. Zero, negative, and unmatched ids are all absent,
    /// not errors.
    pub fn get(&self, id: UserId) -> Option<&User> {
        if id.as_i64() <= 0 {
            return None;
        }
        self.users.get(&id)
    }

    pub fn create(&mut self, input: UserNew) -> Result<User> {
        let name = normalize_name(&input.name).ok_or(ValidationError::NameRequired)?;
        let email = normalize_email(&input.email).ok_or(ValidationError::EmailRequired)?;
        if self.users.values().any(|user| user.email == email) {
            return Err(ValidationError::DuplicateEmail(email));
        }

        self.next_id += 1;
        let user = User {
            id: UserId::from_raw(self.next_id),
            name,
            email,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Case-insensitive literal substring match on names, in insertion
    /// order. The empty query matches every record.
    pub fn search(&self, query: &str) -> Vec<&User> {
        let needle = query.to_lowercase();
        self.users
            .values()
            .filter(|user| user.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
