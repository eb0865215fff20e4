//! Typed list-query construction.
//!
//! Every list endpoint takes a small filter struct with explicit optional
//! fields and compiles it to a parameterized query through
//! `sqlx::QueryBuilder`. User input is only ever bound as a parameter;
//! column names come from code.

use sqlx::{Postgres, QueryBuilder};

/// Applied when a list request carries no explicit limit. There is no
/// enforced upper bound; callers can ask for arbitrarily large pages.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Escape LIKE wildcards in a user-supplied search term and wrap it for
/// substring matching.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Append a case-insensitive substring match across `columns`:
/// ` AND (col1 ILIKE $n OR col2 ILIKE $n+1 ...)`
pub fn push_search(qb: &mut QueryBuilder<'_, Postgres>, columns: &[&str], term: &str) {
    let pattern = like_pattern(term);
    qb.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(format!("{} ILIKE ", column));
        qb.push_bind(pattern.clone());
    }
    qb.push(")");
}

/// Append an equality condition on a single column.
pub fn push_eq(qb: &mut QueryBuilder<'_, Postgres>, column: &str, value: &str) {
    qb.push(format!(" AND {} = ", column));
    qb.push_bind(value.to_string());
}

/// Append the LIMIT clause, falling back to [`DEFAULT_LIST_LIMIT`].
pub fn push_limit(qb: &mut QueryBuilder<'_, Postgres>, limit: Option<i64>) {
    qb.push(" LIMIT ");
    qb.push_bind(limit.unwrap_or(DEFAULT_LIST_LIMIT));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("alice"), "%alice%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c\\d"), "%c\\\\d%");
    }

    #[test]
    fn search_expands_to_or_group() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM contacts WHERE company_id = ");
        qb.push_bind(uuid::Uuid::nil());
        push_search(&mut qb, &["name", "email"], "smith");
        assert_eq!(
            qb.sql(),
            "SELECT * FROM contacts WHERE company_id = $1 AND (name ILIKE $2 OR email ILIKE $3)"
        );
    }

    #[test]
    fn eq_and_limit_use_placeholders() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM tasks WHERE company_id = ");
        qb.push_bind(uuid::Uuid::nil());
        push_eq(&mut qb, "status", "pending");
        push_limit(&mut qb, None);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM tasks WHERE company_id = $1 AND status = $2 LIMIT $3"
        );
    }
}
