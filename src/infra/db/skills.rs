use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};
use uuid::Uuid;

use crate::application::repos::{
    CreateSkillParams, RepoError, SkillsRepo, SkillsWriteRepo, UpdateSkillParams,
};
use crate::domain::entities::SkillRecord;

use super::{PostgresRepositories, map_sqlx_error};

const SKILL_COLUMNS: &str = "id, name, category, level, sort_order, created_at";

fn map_skill(row: &PgRow) -> Result<SkillRecord, sqlx::Error> {
    Ok(SkillRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        level: row.try_get("level")?,
        sort_order: row.try_get("sort_order")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl SkillsRepo for PostgresRepositories {
    async fn list_skills(&self) -> Result<Vec<SkillRecord>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {SKILL_COLUMNS} FROM skills ORDER BY category ASC, sort_order ASC, name ASC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(map_skill)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl SkillsWriteRepo for PostgresRepositories {
    async fn create_skill(&self, params: CreateSkillParams) -> Result<SkillRecord, RepoError> {
        let row = sqlx::query(&format!(
            "INSERT INTO skills (name, category, level, sort_order) \
             VALUES ($1, $2, $3, $4) RETURNING {SKILL_COLUMNS}"
        ))
        .bind(&params.name)
        .bind(params.category)
        .bind(params.level)
        .bind(params.sort_order)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_skill(&row).map_err(map_sqlx_error)
    }

    async fn update_skill(&self, params: UpdateSkillParams) -> Result<SkillRecord, RepoError> {
        let row = sqlx::query(&format!(
            "UPDATE skills SET name = $2, category = $3, level = $4, sort_order = $5 \
             WHERE id = $1 RETURNING {SKILL_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.name)
        .bind(params.category)
        .bind(params.level)
        .bind(params.sort_order)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_skill(&row).map_err(map_sqlx_error)
    }

    async fn delete_skill(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
