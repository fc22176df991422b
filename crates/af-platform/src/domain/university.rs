//! University and Program Catalog Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A university in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: String,
    pub name: String,
    /// Short unique code (URL-safe).
    pub code: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl University {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            name: name.into(),
            code: code.into(),
            city: city.into(),
            state: state.into(),
            rank: None,
            description: None,
            website: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }
}

/// A degree program offered by a university.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub university_id: String,
    pub name: String,
    pub degree: String,
    pub duration_years: i32,
    /// Whole currency units.
    pub total_fees: i64,
    pub application_fee: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Program {
    pub fn new(
        university_id: impl Into<String>,
        name: impl Into<String>,
        degree: impl Into<String>,
        duration_years: i32,
    ) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            university_id: university_id.into(),
            name: name.into(),
            degree: degree.into(),
            duration_years,
            total_fees: 0,
            application_fee: 0,
            description: None,
            eligibility: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_fees(mut self, total_fees: i64, application_fee: i64) -> Self {
        self.total_fees = total_fees;
        self.application_fee = application_fee;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_eligibility(mut self, eligibility: impl Into<String>) -> Self {
        self.eligibility = Some(eligibility.into());
        self
    }
}
