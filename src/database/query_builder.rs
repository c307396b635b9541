use sqlx::{self, postgres::PgArguments, FromRow, PgPool};

use crate::database::store::StoreError;
use crate::filter::{Filter, FilterData, SqlParam, SqlResult};

/// Typed SELECT over a single table, rendered by [`Filter`].
pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, StoreError> {
        Ok(Self {
            filter: Filter::new(table_name)?,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, StoreError> {
        self.filter.assign(filter_data)?;
        Ok(self)
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, StoreError> {
        let sql_result = self.sql_result()?;
        tracing::debug!(query = %sql_result.query, params = sql_result.params.len(), "select_all");

        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(pool).await?)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, StoreError> {
        let sql_result = self.sql_result()?;
        tracing::debug!(query = %sql_result.query, params = sql_result.params.len(), "select_optional");

        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_optional(pool).await?)
    }

    fn sql_result(&self) -> Result<SqlResult, StoreError> {
        Ok(self.filter.to_sql()?)
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    param: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match param {
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Integer(i) => q.bind(*i),
    }
}
