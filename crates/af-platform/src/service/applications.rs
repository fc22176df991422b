//! Application Service
//!
//! Submission writes the application and the applicant's contact details in a
//! single transaction; status changes enforce the review pipeline and are
//! audited.

use std::collections::HashMap;

use sqlx::PgPool;

use crate::domain::{
    AcademicHistory, Application, ApplicationStatus, AuditAction, AuditLog, ContactDetails,
};
use crate::error::{PortalError, Result};
use crate::repository::{ApplicationRepository, ProfileRepository, ProgramRepository};
use crate::service::audit::AuditService;
use crate::service::auth::{checks, AuthContext};

/// Everything the submission wizard collects.
pub struct SubmitApplication {
    pub university_id: String,
    pub program_id: String,
    pub academics: AcademicHistory,
    pub contact: ContactDetails,
}

/// Per-status counts and fee totals for the staff dashboard.
#[derive(Debug, Clone, Default)]
pub struct ApplicationStats {
    pub total: i64,
    pub by_status: HashMap<String, i64>,
    /// Sum of application fees across submitted applications.
    pub total_fees: i64,
}

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
    applications: ApplicationRepository,
    profiles: ProfileRepository,
    programs: ProgramRepository,
    audit: AuditService,
}

impl ApplicationService {
    pub fn new(
        pool: PgPool,
        applications: ApplicationRepository,
        profiles: ProfileRepository,
        programs: ProgramRepository,
        audit: AuditService,
    ) -> Self {
        Self {
            pool,
            applications,
            profiles,
            programs,
            audit,
        }
    }

    /// Submit a new application. The insert and the profile contact update
    /// commit together or not at all.
    pub async fn submit(
        &self,
        ctx: &AuthContext,
        request: SubmitApplication,
    ) -> Result<Application> {
        let mut profile = self
            .profiles
            .find_by_id(&ctx.profile_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Profile", &ctx.profile_id))?;

        let program = self
            .programs
            .find_by_id(&request.program_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Program", &request.program_id))?;

        if program.university_id != request.university_id {
            return Err(PortalError::validation(
                "Program does not belong to the selected university",
            ));
        }

        if self
            .applications
            .active_exists(&ctx.profile_id, &request.program_id)
            .await?
        {
            return Err(PortalError::duplicate(
                "Application",
                "program_id",
                &request.program_id,
            ));
        }

        let application = Application::submitted(
            &ctx.profile_id,
            &request.university_id,
            &request.program_id,
            program.application_fee,
            request.academics,
        );
        profile.apply_contact_update(request.contact);

        let mut tx = self.pool.begin().await?;
        self.applications.insert(&mut *tx, &application).await?;
        self.profiles.update(&mut *tx, &profile).await?;
        tx.commit().await?;

        self.audit
            .record_for(
                ctx,
                AuditLog::for_entity(
                    AuditAction::Create,
                    "Application",
                    &application.id,
                    format!("Application {} submitted", application.application_number),
                ),
            )
            .await;

        Ok(application)
    }

    /// Apply a staff review transition, optionally replacing the review notes.
    pub async fn transition(
        &self,
        ctx: &AuthContext,
        application_id: &str,
        next: ApplicationStatus,
        admin_notes: Option<String>,
    ) -> Result<Application> {
        checks::require_staff(ctx)?;

        let mut application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Application", application_id))?;

        let previous = application.status;
        application.transition_to(next)?;
        if admin_notes.is_some() {
            application.admin_notes = admin_notes;
        }
        self.applications.update_status(&application).await?;

        self.audit
            .record_for(
                ctx,
                AuditLog::for_entity(
                    AuditAction::StatusChanged,
                    "Application",
                    application_id,
                    format!(
                        "Application {} moved from {} to {}",
                        application.application_number,
                        previous.as_str(),
                        next.as_str()
                    ),
                )
                .with_metadata(serde_json::json!({
                    "from": previous.as_str(),
                    "to": next.as_str(),
                })),
            )
            .await;

        Ok(application)
    }

    pub async fn get(&self, ctx: &AuthContext, application_id: &str) -> Result<Application> {
        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| PortalError::not_found("Application", application_id))?;

        checks::require_self_or_staff(ctx, &application.student_id)?;
        Ok(application)
    }

    pub async fn list_for_student(
        &self,
        ctx: &AuthContext,
        student_id: &str,
    ) -> Result<Vec<Application>> {
        checks::require_self_or_staff(ctx, student_id)?;
        self.applications.list_by_student(student_id).await
    }

    pub async fn list(
        &self,
        ctx: &AuthContext,
        status: Option<ApplicationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Application>, i64)> {
        checks::require_staff(ctx)?;
        let items = self.applications.list(status, limit, offset).await?;
        let total = self.applications.count(status).await?;
        Ok((items, total))
    }

    pub async fn stats(&self, ctx: &AuthContext) -> Result<ApplicationStats> {
        checks::require_staff(ctx)?;
        let by_status: HashMap<String, i64> =
            self.applications.count_by_status().await?.into_iter().collect();
        let total = by_status.values().sum();
        let total_fees = self.applications.sum_fees().await?;
        Ok(ApplicationStats {
            total,
            by_status,
            total_fees,
        })
    }

    pub async fn count_for_student(&self, student_id: &str) -> Result<i64> {
        self.applications.count_for_student(student_id).await
    }
}
