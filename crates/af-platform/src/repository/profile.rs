//! Profile Repository

use sqlx::postgres::{PgExecutor, PgRow};
use sqlx::{PgPool, Row};

use crate::domain::{ContactDetails, Profile, UserRole};
use crate::error::{PortalError, Result};

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, role, full_name, email, password_hash,
                phone, date_of_birth, gender, nationality, address,
                city, state, pincode, father_name, mother_name,
                emergency_contact, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(&profile.id)
        .bind(profile.role.as_str())
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.password_hash)
        .bind(&profile.contact.phone)
        .bind(profile.contact.date_of_birth)
        .bind(&profile.contact.gender)
        .bind(&profile.contact.nationality)
        .bind(&profile.contact.address)
        .bind(&profile.contact.city)
        .bind(&profile.contact.state)
        .bind(&profile.contact.pincode)
        .bind(&profile.contact.father_name)
        .bind(&profile.contact.mother_name)
        .bind(&profile.contact.emergency_contact)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Executor-generic so profile updates can join a larger transaction.
    pub async fn update<'e>(&self, executor: impl PgExecutor<'e>, profile: &Profile) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE profiles SET
                full_name = $2, phone = $3, date_of_birth = $4, gender = $5,
                nationality = $6, address = $7, city = $8, state = $9,
                pincode = $10, father_name = $11, mother_name = $12,
                emergency_contact = $13, updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.full_name)
        .bind(&profile.contact.phone)
        .bind(profile.contact.date_of_birth)
        .bind(&profile.contact.gender)
        .bind(&profile.contact.nationality)
        .bind(&profile.contact.address)
        .bind(&profile.contact.city)
        .bind(&profile.contact.state)
        .bind(&profile.contact.pincode)
        .bind(&profile.contact.father_name)
        .bind(&profile.contact.mother_name)
        .bind(&profile.contact.emergency_contact)
        .bind(profile.updated_at)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PortalError::not_found("Profile", &profile.id));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Profile>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_profile).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let row = sqlx::query("SELECT * FROM profiles WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_profile).transpose()
    }

    pub async fn list(
        &self,
        role: Option<UserRole>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Profile>> {
        let rows = match role {
            Some(role) => {
                sqlx::query(
                    "SELECT * FROM profiles WHERE role = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                )
                .bind(role.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT * FROM profiles ORDER BY created_at DESC LIMIT $1 OFFSET $2")
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(map_profile).collect()
    }

    pub async fn count(&self, role: Option<UserRole>) -> Result<i64> {
        let row = match role {
            Some(role) => {
                sqlx::query("SELECT COUNT(*) AS count FROM profiles WHERE role = $1")
                    .bind(role.as_str())
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("SELECT COUNT(*) AS count FROM profiles")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(row.get("count"))
    }
}

fn map_profile(row: &PgRow) -> Result<Profile> {
    let role: String = row.get("role");
    let role = UserRole::parse(&role)
        .ok_or_else(|| PortalError::internal(format!("Unknown role '{role}' in profiles row")))?;

    Ok(Profile {
        id: row.get("id"),
        role,
        full_name: row.get("full_name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        contact: ContactDetails {
            phone: row.get("phone"),
            date_of_birth: row.get("date_of_birth"),
            gender: row.get("gender"),
            nationality: row.get("nationality"),
            address: row.get("address"),
            city: row.get("city"),
            state: row.get("state"),
            pincode: row.get("pincode"),
            father_name: row.get("father_name"),
            mother_name: row.get("mother_name"),
            emergency_contact: row.get("emergency_contact"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
