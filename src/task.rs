use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub deadline: NaiveDate,
    pub category: Category,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    School,
    Personal,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::School, Category::Personal];

    /// Display label; category names in the data model stay lowercase.
    pub fn label(&self) -> &'static str {
        match self {
            Category::School => "School",
            Category::Personal => "Personal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::School => write!(f, "school"),
            Category::Personal => write!(f, "personal"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "school" => Ok(Category::School),
            "personal" => Ok(Category::Personal),
            other => Err(format!(
                "unknown category '{other}' (expected 'school' or 'personal')"
            )),
        }
    }
}
