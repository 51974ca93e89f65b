use chrono::NaiveDate;

/// One row of the users table after the daily reset has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub messages_today: i64,
    pub last_reset: Option<NaiveDate>,
}
