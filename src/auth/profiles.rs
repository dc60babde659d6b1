use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::auth::repo::{Role, User};

/// Candidate-side profile record, created alongside registration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateProfile {
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    pub resume_url: Option<String>,
    pub created_at: OffsetDateTime,
}

/// HR-side profile record; the company name is mandatory at registration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HrProfile {
    pub user_id: Uuid,
    pub company_name: String,
    pub position: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Role-specific profile as a tagged variant, so creation and lookup dispatch
/// on the role instead of branching on strings.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RoleProfile {
    Candidate(CandidateProfile),
    Hr(HrProfile),
}

impl CandidateProfile {
    pub async fn create(db: &PgPool, user_id: Uuid) -> anyhow::Result<CandidateProfile> {
        let profile = sqlx::query_as::<_, CandidateProfile>(
            "INSERT INTO candidate_profiles (user_id)
             VALUES ($1)
             RETURNING user_id, headline, skills, resume_url, created_at",
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<CandidateProfile>> {
        let profile = sqlx::query_as::<_, CandidateProfile>(
            "SELECT user_id, headline, skills, resume_url, created_at
             FROM candidate_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Partial update; absent fields keep their stored value.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        headline: Option<&str>,
        skills: Option<&[String]>,
        resume_url: Option<&str>,
    ) -> anyhow::Result<Option<CandidateProfile>> {
        let profile = sqlx::query_as::<_, CandidateProfile>(
            "UPDATE candidate_profiles
             SET headline = COALESCE($2, headline),
                 skills = COALESCE($3, skills),
                 resume_url = COALESCE($4, resume_url)
             WHERE user_id = $1
             RETURNING user_id, headline, skills, resume_url, created_at",
        )
        .bind(user_id)
        .bind(headline)
        .bind(skills)
        .bind(resume_url)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }
}

impl HrProfile {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        company_name: &str,
    ) -> anyhow::Result<HrProfile> {
        let profile = sqlx::query_as::<_, HrProfile>(
            "INSERT INTO hr_profiles (user_id, company_name)
             VALUES ($1, $2)
             RETURNING user_id, company_name, position, created_at",
        )
        .bind(user_id)
        .bind(company_name)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    pub async fn find(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<HrProfile>> {
        let profile = sqlx::query_as::<_, HrProfile>(
            "SELECT user_id, company_name, position, created_at
             FROM hr_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        company_name: Option<&str>,
        position: Option<&str>,
    ) -> anyhow::Result<Option<HrProfile>> {
        let profile = sqlx::query_as::<_, HrProfile>(
            "UPDATE hr_profiles
             SET company_name = COALESCE($2, company_name),
                 position = COALESCE($3, position)
             WHERE user_id = $1
             RETURNING user_id, company_name, position, created_at",
        )
        .bind(user_id)
        .bind(company_name)
        .bind(position)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }
}

impl RoleProfile {
    /// Create the single role-specific profile matching the user's role.
    /// Admin accounts carry no profile and are not created through
    /// registration in the first place.
    pub async fn create_for(
        db: &PgPool,
        user: &User,
        company_name: Option<&str>,
    ) -> anyhow::Result<RoleProfile> {
        match user.role {
            Role::Candidate => Ok(RoleProfile::Candidate(
                CandidateProfile::create(db, user.id).await?,
            )),
            Role::Hr => {
                let company = company_name
                    .ok_or_else(|| anyhow::anyhow!("company name missing for hr profile"))?;
                Ok(RoleProfile::Hr(HrProfile::create(db, user.id, company).await?))
            }
            Role::Admin => anyhow::bail!("admin accounts have no role profile"),
        }
    }

    pub async fn find_for(db: &PgPool, user: &User) -> anyhow::Result<Option<RoleProfile>> {
        match user.role {
            Role::Candidate => Ok(CandidateProfile::find(db, user.id)
                .await?
                .map(RoleProfile::Candidate)),
            Role::Hr => Ok(HrProfile::find(db, user.id).await?.map(RoleProfile::Hr)),
            Role::Admin => Ok(None),
        }
    }

    /// Delete both possible profile rows without branching on role.
    /// Best-effort: failures are logged and do not abort account deletion.
    pub async fn delete_all_for(db: &PgPool, user_id: Uuid) {
        if let Err(e) = sqlx::query("DELETE FROM candidate_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await
        {
            warn!(error = %e, %user_id, "candidate profile delete failed");
        }
        if let Err(e) = sqlx::query("DELETE FROM hr_profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await
        {
            warn!(error = %e, %user_id, "hr profile delete failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn role_profile_serializes_with_kind_tag() {
        let profile = RoleProfile::Hr(HrProfile {
            user_id: Uuid::new_v4(),
            company_name: "Acme".into(),
            position: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        });
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains(r#""kind":"hr""#));
        assert!(json.contains(r#""company_name":"Acme""#));
    }
}
