//! Application Entity
//!
//! A student's request to enroll in a specific program at a university.
//! Applications move along a linear review pipeline and are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderReview,
    DocsPending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::DocsPending => "docs_pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ApplicationStatus::Draft),
            "submitted" => Some(ApplicationStatus::Submitted),
            "under_review" => Some(ApplicationStatus::UnderReview),
            "docs_pending" => Some(ApplicationStatus::DocsPending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    /// Approved and rejected applications never change again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }

    /// Allowed edges of the review pipeline.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Draft, Submitted)
                | (Submitted, UnderReview)
                | (UnderReview, DocsPending)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (DocsPending, UnderReview)
                | (DocsPending, Approved)
                | (DocsPending, Rejected)
        )
    }
}

/// Academic history captured by the application wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicHistory {
    pub tenth_school: Option<String>,
    pub tenth_board: Option<String>,
    pub tenth_year: Option<i32>,
    pub tenth_percentage: Option<f64>,

    pub twelfth_school: Option<String>,
    pub twelfth_board: Option<String>,
    pub twelfth_year: Option<i32>,
    pub twelfth_percentage: Option<f64>,

    pub graduation_college: Option<String>,
    pub graduation_university: Option<String>,
    pub graduation_degree: Option<String>,
    pub graduation_year: Option<i32>,
    pub graduation_percentage: Option<f64>,
}

/// An enrollment application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    /// Human-facing reference, e.g. "APP02411358".
    pub application_number: String,
    pub student_id: String,
    pub university_id: String,
    pub program_id: String,
    pub status: ApplicationStatus,
    pub application_fee: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub academics: AcademicHistory,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Build a submitted application, stamped with the submission time and a
    /// generated application number.
    pub fn submitted(
        student_id: impl Into<String>,
        university_id: impl Into<String>,
        program_id: impl Into<String>,
        application_fee: i64,
        academics: AcademicHistory,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: crate::TsidGenerator::generate(),
            application_number: generate_application_number(),
            student_id: student_id.into(),
            university_id: university_id.into(),
            program_id: program_id.into(),
            status: ApplicationStatus::Submitted,
            application_fee,
            submission_date: Some(now),
            academics,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a staff review transition.
    pub fn transition_to(&mut self, next: ApplicationStatus) -> crate::error::Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(crate::PortalError::invalid_transition(
                self.status.as_str(),
                next.as_str(),
            ));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Application numbers mirror ticket numbers: a fixed prefix plus the last
/// eight digits of the current Unix millisecond clock.
fn generate_application_number() -> String {
    format!("APP{:08}", Utc::now().timestamp_millis() % 100_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_stamps_number_and_date() {
        let app = Application::submitted("s1", "u1", "p1", 500, AcademicHistory::default());
        assert_eq!(app.status, ApplicationStatus::Submitted);
        assert!(app.submission_date.is_some());
        assert!(app.application_number.starts_with("APP"));
        assert_eq!(app.application_number.len(), 11);
    }

    #[test]
    fn review_pipeline_edges() {
        use ApplicationStatus::*;
        assert!(Submitted.can_transition_to(UnderReview));
        assert!(UnderReview.can_transition_to(DocsPending));
        assert!(DocsPending.can_transition_to(UnderReview));
        assert!(UnderReview.can_transition_to(Approved));
        assert!(!Submitted.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(UnderReview));
    }

    #[test]
    fn transition_rejects_terminal_states() {
        let mut app = Application::submitted("s1", "u1", "p1", 500, AcademicHistory::default());
        app.transition_to(ApplicationStatus::UnderReview).unwrap();
        app.transition_to(ApplicationStatus::Approved).unwrap();

        let err = app.transition_to(ApplicationStatus::Rejected).unwrap_err();
        assert!(matches!(err, crate::PortalError::InvalidTransition { .. }));
        assert_eq!(app.status, ApplicationStatus::Approved);
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [
            ApplicationStatus::Draft,
            ApplicationStatus::Submitted,
            ApplicationStatus::UnderReview,
            ApplicationStatus::DocsPending,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("bogus"), None);
    }
}
