use serde_json::Value;
use sqlx::PgPool;

use crate::error::Result;

pub async fn insert_document(
    pool: &PgPool,
    collection: &str,
    id: &str,
    body: &Value,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO documents (collection, id, body)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(collection)
    .bind(id)
    .bind(body)
    .execute(pool)
    .await?;

    Ok(())
}
