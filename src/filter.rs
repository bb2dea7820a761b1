use crate::task::{Category, Task};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Current view filter. Never persisted; narrowing the view does not touch
/// the underlying collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Filters {
    pub category: CategoryFilter,
    pub date: Option<NaiveDate>,
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filters {
    /// All three clauses must pass: category, then date, then status.
    pub fn matches(&self, task: &Task) -> bool {
        if let CategoryFilter::Only(category) = self.category {
            if task.category != category {
                return false;
            }
        }
        if let Some(date) = self.date {
            // Exact deadline match, not a range.
            if task.deadline != date {
                return false;
            }
        }
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Filters::default()
    }
}

impl CategoryFilter {
    pub fn cycle(self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::School),
            CategoryFilter::Only(Category::School) => CategoryFilter::Only(Category::Personal),
            CategoryFilter::Only(Category::Personal) => CategoryFilter::All,
        }
    }
}

impl StatusFilter {
    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Active => write!(f, "active"),
            StatusFilter::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse::<Category>().map(CategoryFilter::Only)
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!(
                "unknown status '{other}' (expected 'all', 'active' or 'completed')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(category: Category, deadline: &str, completed: bool) -> Task {
        Task {
            id: 1,
            text: "task".to_string(),
            deadline: deadline.parse().unwrap(),
            category,
            completed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn default_filters_match_everything() {
        let filters = Filters::default();
        assert!(filters.matches(&task(Category::School, "2024-05-01", false)));
        assert!(filters.matches(&task(Category::Personal, "2030-01-01", true)));
    }

    #[test]
    fn category_clause_rejects_other_category() {
        let filters = Filters {
            category: CategoryFilter::Only(Category::School),
            ..Filters::default()
        };
        assert!(filters.matches(&task(Category::School, "2024-05-01", false)));
        assert!(!filters.matches(&task(Category::Personal, "2024-05-01", false)));
    }

    #[test]
    fn date_clause_is_exact_equality() {
        let filters = Filters {
            date: Some("2024-05-01".parse().unwrap()),
            ..Filters::default()
        };
        assert!(filters.matches(&task(Category::School, "2024-05-01", false)));
        assert!(!filters.matches(&task(Category::School, "2024-05-02", false)));
        assert!(!filters.matches(&task(Category::School, "2024-04-30", false)));
    }

    #[test]
    fn status_clause_splits_on_completion() {
        let active_only = Filters {
            status: StatusFilter::Active,
            ..Filters::default()
        };
        let completed_only = Filters {
            status: StatusFilter::Completed,
            ..Filters::default()
        };
        let done = task(Category::Personal, "2024-05-01", true);
        let open = task(Category::Personal, "2024-05-01", false);
        assert!(active_only.matches(&open));
        assert!(!active_only.matches(&done));
        assert!(completed_only.matches(&done));
        assert!(!completed_only.matches(&open));
    }

    #[test]
    fn all_clauses_must_pass() {
        let filters = Filters {
            category: CategoryFilter::Only(Category::School),
            date: Some("2024-05-01".parse().unwrap()),
            status: StatusFilter::Active,
        };
        assert!(filters.matches(&task(Category::School, "2024-05-01", false)));
        assert!(!filters.matches(&task(Category::School, "2024-05-01", true)));
        assert!(!filters.matches(&task(Category::School, "2024-05-02", false)));
        assert!(!filters.matches(&task(Category::Personal, "2024-05-01", false)));
    }

    #[test]
    fn filters_parse_from_select_values() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "school".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::School)
        );
        assert_eq!("active".parse::<StatusFilter>().unwrap(), StatusFilter::Active);
        assert!("done".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn cycling_walks_every_option() {
        let mut status = StatusFilter::All;
        for _ in 0..3 {
            status = status.cycle();
        }
        assert_eq!(status, StatusFilter::All);

        let mut category = CategoryFilter::All;
        for _ in 0..3 {
            category = category.cycle();
        }
        assert_eq!(category, CategoryFilter::All);
    }
}
