// src/db/document_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::document::{Document, DocumentDirection, DocumentFilter, DocumentKind, DocumentStatus},
};

#[derive(Clone, Default)]
pub struct DocumentRepository;

impl DocumentRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        intervenant_id: Option<Uuid>,
        kind: DocumentKind,
        direction: DocumentDirection,
        reference: &str,
        total_amount: Decimal,
        issued_on: NaiveDate,
        due_on: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> Result<Document, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (
                tenant_id, intervenant_id, kind, direction, reference,
                total_amount, paid_amount, remaining_amount, status,
                issued_on, due_on, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, 0, $6, 'UNPAID', $7, $8, $9)
            RETURNING *
            "#,
        )
            .bind(tenant_id)
            .bind(intervenant_id)
            .bind(kind)
            .bind(direction)
            .bind(reference)
            .bind(total_amount)
            .bind(issued_on)
            .bind(due_on)
            .bind(notes)
            .fetch_one(executor)
            .await?;
        Ok(document)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        filter: &DocumentFilter,
    ) -> Result<Vec<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM documents WHERE tenant_id = ");
        qb.push_bind(tenant_id);

        if let Some(direction) = filter.direction {
            qb.push(" AND direction = ").push_bind(direction);
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(intervenant_id) = filter.intervenant_id {
            qb.push(" AND intervenant_id = ").push_bind(intervenant_id);
        }
        qb.push(" ORDER BY issued_on DESC, created_at DESC");

        let documents = qb.build_query_as::<Document>().fetch_all(executor).await?;
        Ok(documents)
    }

    /// Todos os documentos do tenant, base para as estatísticas.
    pub async fn list_all<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.list(executor, tenant_id, &DocumentFilter::default()).await
    }

    pub async fn list_unpaid<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            WHERE tenant_id = $1 AND status <> 'PAID'
            ORDER BY due_on ASC NULLS LAST
            "#,
        )
            .bind(tenant_id)
            .fetch_all(executor)
            .await?;
        Ok(documents)
    }

    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Document>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let document = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
            .bind(id)
            .bind(tenant_id)
            .fetch_optional(executor)
            .await?;
        Ok(document)
    }

    pub async fn apply_payment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        paid: Decimal,
        remaining: Decimal,
        status: DocumentStatus,
    ) -> Result<Document, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let document = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET paid_amount = $3, remaining_amount = $4, status = $5, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(tenant_id)
            .bind(paid)
            .bind(remaining)
            .bind(status)
            .fetch_one(executor)
            .await?;
        Ok(document)
    }
}
