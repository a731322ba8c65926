use std::borrow::Cow;

use sqlx::{Encode, PgPool, Postgres, QueryBuilder, Type};
use uuid::Uuid;

use crate::{
    entities::{dashboard::StatusCounts, envelope::ListFilter, option_fields::OptionField},
    errors::AppError,
};

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxPostRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxTestimonialRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxExperienceRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxCertificationRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: PgPool,
}

/// `UPDATE <table> SET ...` built from a partial patch. `updated_at` is
/// always bumped; absent fields are left out of the statement.
pub struct UpdateSet<'args> {
    builder: QueryBuilder<'args, Postgres>,
}

impl<'args> UpdateSet<'args> {
    pub fn new(table: &'static str) -> Self {
        UpdateSet {
            builder: QueryBuilder::new(format!("UPDATE {table} SET updated_at = NOW()")),
        }
    }

    pub fn set<T>(&mut self, column: &'static str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres>,
    {
        if let Some(value) = value {
            self.builder.push(format!(", {column} = ")).push_bind(value);
        }
        self
    }

    pub fn set_nullable<T>(&mut self, column: &'static str, field: OptionField<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres>,
    {
        match field {
            OptionField::Unchanged => {}
            OptionField::SetToNull => {
                self.builder.push(format!(", {column} = NULL"));
            }
            OptionField::SetToValue(value) => {
                self.builder.push(format!(", {column} = ")).push_bind(value);
            }
        }
        self
    }

    /// Raw assignment without bound values, e.g. `published_at = COALESCE(...)`.
    pub fn set_raw(&mut self, assignment: &'static str) -> &mut Self {
        self.builder.push(", ").push(assignment);
        self
    }

    pub fn where_id_returning(mut self, id: Uuid) -> QueryBuilder<'args, Postgres> {
        self.builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");
        self.builder
    }
}

/// Starts `SELECT <select> FROM <table> WHERE TRUE` with the status and
/// full-text-ish search conditions every content list shares.
pub fn filtered_select<'args>(
    select: &str,
    table: &'static str,
    filter: &ListFilter,
    search_columns: &[&str],
) -> QueryBuilder<'args, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {select} FROM {table} WHERE TRUE"));

    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }

    if let Some(term) = &filter.search {
        if !search_columns.is_empty() {
            let pattern = format!("%{}%", escape_like(term));
            builder.push(" AND (");
            for (i, column) in search_columns.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push(format!("{column} ILIKE ")).push_bind(pattern.clone());
            }
            builder.push(")");
        }
    }

    builder
}

pub fn push_page(builder: &mut QueryBuilder<'_, Postgres>, filter: &ListFilter) {
    builder.push(" LIMIT ").push_bind(filter.limit);
    builder.push(" OFFSET ").push_bind(filter.offset);
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Published / draft breakdown for one content table.
pub async fn status_counts(pool: &PgPool, table: &'static str) -> Result<StatusCounts, AppError> {
    let sql = format!(
        "SELECT COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE status = 'published') AS published, \
                COUNT(*) FILTER (WHERE status = 'draft') AS draft \
         FROM {table}"
    );
    sqlx::query_as::<_, StatusCounts>(&sql)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

pub async fn delete_by_id(pool: &PgPool, table: &'static str, id: &Uuid) -> Result<bool, AppError> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Maps a unique violation to a 409 with a resource-specific message.
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code() == Some(Cow::Borrowed("23505")) {
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::from(err)
}
