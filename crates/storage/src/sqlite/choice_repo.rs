use super::{SqliteRepository, mapping::map_choice_row};
use crate::repository::{ChoiceRepository, PersistedChoice, StorageError};

#[async_trait::async_trait]
impl ChoiceRepository for SqliteRepository {
    async fn upsert_choice(&self, choice: &PersistedChoice) -> Result<(), StorageError> {
        let label = choice.choice.label();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query(
            r"
                INSERT INTO choices (question, selected_response, recorded_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(question) DO UPDATE SET
                    selected_response = excluded.selected_response,
                    recorded_at = excluded.recorded_at
            ",
        )
        .bind(&choice.question)
        .bind(label)
        .bind(choice.recorded_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        // Audit trail only; never read back for correctness.
        sqlx::query(
            r"
                INSERT INTO choice_log (question, selected_response, recorded_at)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(&choice.question)
        .bind(label)
        .bind(choice.recorded_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        tracing::debug!(question = %choice.question, label, "choice upserted");
        Ok(())
    }

    async fn list_choices(&self) -> Result<Vec<PersistedChoice>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT question, selected_response, recorded_at
                FROM choices
                ORDER BY question ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_choice_row(&row)?);
        }
        Ok(out)
    }
}
