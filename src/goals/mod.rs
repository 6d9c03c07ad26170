// src/goals/mod.rs
// Goal records: free-form titles the user is working toward

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    pub description: Option<String>,
}

pub struct GoalService {
    pool: SqlitePool,
}

impl GoalService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: CreateGoalRequest) -> Result<Goal> {
        let result = sqlx::query("INSERT INTO goals (title, description) VALUES (?, ?)")
            .bind(&req.title)
            .bind(&req.description)
            .execute(&self.pool)
            .await?;

        let goal = sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;

        Ok(goal)
    }

    pub async fn list(&self) -> Result<Vec<Goal>> {
        let goals = sqlx::query_as::<_, Goal>("SELECT * FROM goals ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(goals)
    }
}
