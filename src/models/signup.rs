use crate::schema::signup;
use chrono::offset::Utc;
use chrono::DateTime;

/// A signup row: one per email address, created on the first signup attempt
/// for that address and never deleted.
#[derive(Queryable)]
pub struct Signup {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    /// Set (and re-set) whenever the signup is finished through its token.
    /// `None` means the confirmation link hasn't been clicked yet.
    pub completed_at: Option<DateTime<Utc>>,
    pub email: String,
    pub last_sent_at: DateTime<Utc>,
    pub num_attempts: i64,
    pub token: String,
}

/// Column defaults fill in the timestamps and set `num_attempts` to 1.
#[derive(Insertable)]
#[table_name = "signup"]
pub struct NewSignup<'a> {
    pub email: &'a str,
    pub token: &'a str,
}
