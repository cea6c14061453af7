use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::db::Database;

impl User {
    /// Find a user by email. Emails are compared case-insensitively.
    pub fn find_by_email<'a>(db: &'a Database, email: &str) -> Option<&'a User> {
        db.users.iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn find_by_id(db: &Database, id: Uuid) -> Option<&User> {
        db.users.iter().find(|u| u.id == id)
    }
}
