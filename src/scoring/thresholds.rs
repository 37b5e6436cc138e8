use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Transaction-count breakpoints. Each field is the minimum count for that tier;
/// anything below `explorer` is a Newcomer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReputationThresholds {
    pub explorer: u64,
    pub contributor: u64,
    pub veteran: u64,
    pub legend: u64,
}

impl Default for ReputationThresholds {
    fn default() -> Self {
        Self {
            explorer: 10,
            contributor: 50,
            veteran: 200,
            legend: 1000,
        }
    }
}

impl ReputationThresholds {
    pub fn validate(&self) -> Result<(), String> {
        if self.explorer == 0 {
            return Err("Explorer threshold must be greater than 0".to_string());
        }

        let ordered = [self.explorer, self.contributor, self.veteran, self.legend];
        if ordered.windows(2).any(|w| w[0] >= w[1]) {
            return Err(format!(
                "Thresholds must be strictly increasing, got {}/{}/{}/{}",
                self.explorer, self.contributor, self.veteran, self.legend
            ));
        }

        Ok(())
    }

    /// Half-open `[lower, upper)` transaction-count band for a category.
    /// Legend has no upper bound.
    pub fn band(&self, category: Category) -> (u64, Option<u64>) {
        match category {
            Category::Newcomer => (0, Some(self.explorer)),
            Category::Explorer => (self.explorer, Some(self.contributor)),
            Category::Contributor => (self.contributor, Some(self.veteran)),
            Category::Veteran => (self.veteran, Some(self.legend)),
            Category::Legend => (self.legend, None),
        }
    }

    /// Boundary values belong to the upper tier.
    pub fn categorize(&self, transaction_count: u64) -> Category {
        match transaction_count {
            c if c < self.explorer => Category::Newcomer,
            c if c < self.contributor => Category::Explorer,
            c if c < self.veteran => Category::Contributor,
            c if c < self.legend => Category::Veteran,
            _ => Category::Legend,
        }
    }
}
