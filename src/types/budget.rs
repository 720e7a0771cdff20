use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::require_field;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSettings {
    pub total_amount: f64,
    pub updated_by: String,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumBudget {
    pub id: u64,
    pub forum_name: String,
    pub allocated_amount: f64,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub total_budget: f64,
    pub last_updated: Option<u64>,
    pub updated_by: Option<String>,
    pub allocations: Vec<ForumBudget>,
    pub allocated: f64,
    pub remaining: f64,
}

impl BudgetOverview {
    pub fn build(settings: Option<BudgetSettings>, allocations: Vec<ForumBudget>) -> Self {
        let allocated: f64 = allocations.iter().map(|f| f.allocated_amount).sum();
        let (total_budget, last_updated, updated_by) = match settings {
            Some(s) => (s.total_amount, Some(s.update_time), Some(s.updated_by)),
            None => (0.0, None, None),
        };
        Self {
            total_budget,
            last_updated,
            updated_by,
            allocations,
            allocated,
            remaining: total_budget - allocated,
        }
    }
}

fn check_amount(name: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        bail!("{name} must be a non-negative number");
    }
    Ok(())
}

/// Body of a total budget update. Any `user_role` field a client sends is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTotalRequest {
    pub total_amount: f64,
}

impl SetTotalRequest {
    pub fn validate(&self) -> Result<()> {
        check_amount("total_amount", self.total_amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateRequest {
    pub forum_id: u64,
    pub amount: f64,
}

impl AllocateRequest {
    pub fn validate(&self) -> Result<()> {
        check_amount("amount", self.amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateForumRequest {
    pub name: String,
}

impl CreateForumRequest {
    pub fn validate(&mut self) -> Result<()> {
        self.name = require_field("name", &self.name)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameForumRequest {
    pub id: u64,
    pub name: String,
}

impl RenameForumRequest {
    pub fn validate(&mut self) -> Result<()> {
        self.name = require_field("name", &self.name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forum(id: u64, name: &str, amount: f64) -> ForumBudget {
        ForumBudget {
            id,
            forum_name: name.to_string(),
            allocated_amount: amount,
            update_time: 0,
        }
    }

    #[test]
    fn test_budget_overview() {
        let overview = BudgetOverview::build(None, vec![]);
        assert_eq!(overview.total_budget, 0.0);
        assert_eq!(overview.last_updated, None);
        assert_eq!(overview.remaining, 0.0);

        let settings = BudgetSettings {
            total_amount: 1000.0,
            updated_by: String::from("Tess"),
            update_time: 42,
        };
        let overview = BudgetOverview::build(
            Some(settings),
            vec![forum(1, "Arts", 250.0), forum(2, "Sports", 300.5)],
        );
        assert_eq!(overview.allocated, 550.5);
        assert_eq!(overview.remaining, 449.5);
        assert_eq!(overview.last_updated, Some(42));
        assert_eq!(overview.updated_by.as_deref(), Some("Tess"));
    }

    #[test]
    fn test_budget_requests() {
        let req: SetTotalRequest =
            serde_json::from_str(r#"{"total_amount":500,"user_role":"chair"}"#).unwrap();
        req.validate().unwrap();

        let req = SetTotalRequest { total_amount: -1.0 };
        assert!(req.validate().is_err());

        let req = AllocateRequest {
            forum_id: 1,
            amount: f64::NAN,
        };
        assert!(req.validate().is_err());

        let mut req = RenameForumRequest {
            id: 1,
            name: String::from("   "),
        };
        assert!(req.validate().is_err());
    }
}
