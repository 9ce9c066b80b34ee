use serde::Serialize;

/// Status every task starts with, regardless of what the caller supplies.
pub const DEFAULT_STATUS: &str = "Pending";

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub status: String,
}
