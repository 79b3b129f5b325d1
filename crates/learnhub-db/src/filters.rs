//! `WHERE` clause assembly for filtered list queries.
//!
//! A list service writes one function that applies its filters to a
//! [`QueryBuilder`], then calls it for both the `COUNT(*)` and the page query so
//! the two always agree. Absent filters (`None`) add nothing.
//!
//! ```ignore
//! fn apply<'a>(qb: &mut QueryBuilder<'a, Postgres>, f: &CourseFilterParams) {
//!     Filters::new(qb)
//!         .contains_ci("title", f.title.as_deref())
//!         .eq("instructor_id", f.instructor)
//!         .gte("price", f.low_price)
//!         .overlaps("tags", f.tags.clone());
//! }
//! ```

use sqlx::{Encode, Postgres, QueryBuilder, Type};

pub struct Filters<'qb, 'args> {
    qb: &'qb mut QueryBuilder<'args, Postgres>,
    has_clause: bool,
}

impl<'qb, 'args> Filters<'qb, 'args> {
    pub fn new(qb: &'qb mut QueryBuilder<'args, Postgres>) -> Self {
        Self {
            qb,
            has_clause: false,
        }
    }

    fn next_clause(&mut self) -> &mut QueryBuilder<'args, Postgres> {
        if self.has_clause {
            self.qb.push(" AND ");
        } else {
            self.qb.push(" WHERE ");
            self.has_clause = true;
        }
        self.qb
    }

    /// Case-insensitive substring match; `%` and `_` in the value match literally.
    pub fn contains_ci(&mut self, column: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let pattern = format!("%{}%", escape_like(value));
            self.next_clause()
                .push(column)
                .push(" ILIKE ")
                .push_bind(pattern);
        }
        self
    }

    pub fn eq<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        self.compare(column, " = ", value)
    }

    pub fn gte<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        self.compare(column, " >= ", value)
    }

    pub fn lte<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        self.compare(column, " <= ", value)
    }

    /// `value = ANY(column)` for array columns.
    pub fn array_contains<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.next_clause()
                .push_bind(value)
                .push(" = ANY(")
                .push(column)
                .push(")");
        }
        self
    }

    /// `column && values` (shares at least one element). Empty lists add nothing.
    pub fn overlaps<T>(&mut self, column: &str, values: Option<Vec<T>>) -> &mut Self
    where
        Vec<T>: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if let Some(values) = values.filter(|v| !v.is_empty()) {
            self.next_clause()
                .push(column)
                .push(" && ")
                .push_bind(values);
        }
        self
    }

    fn compare<T>(&mut self, column: &str, op: &str, value: Option<T>) -> &mut Self
    where
        T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
    {
        if let Some(value) = value {
            self.next_clause().push(column).push(op).push_bind(value);
        }
        self
    }
}

/// Appends ` LIMIT $n OFFSET $m`.
pub fn push_page(qb: &mut QueryBuilder<'_, Postgres>, limit: i64, offset: i64) {
    qb.push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_no_filters_adds_nothing() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM courses");
        Filters::new(&mut qb)
            .contains_ci("title", None)
            .eq::<Uuid>("instructor_id", None)
            .overlaps::<String>("tags", Some(vec![]));
        assert_eq!(qb.sql(), "SELECT * FROM courses");
    }

    #[test]
    fn test_filters_join_with_and() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM courses");
        Filters::new(&mut qb)
            .contains_ci("title", Some("rust"))
            .eq("instructor_id", Some(Uuid::new_v4()))
            .gte("price", Some(10.0_f64))
            .lte("price", Some(99.5_f64))
            .overlaps("tags", Some(vec!["web".to_string()]));
        assert_eq!(
            qb.sql(),
            "SELECT * FROM courses WHERE title ILIKE $1 AND instructor_id = $2 \
             AND price >= $3 AND price <= $4 AND tags && $5"
        );
    }

    #[test]
    fn test_eq_and_array_contains() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM conversations");
        Filters::new(&mut qb)
            .eq("status", Some("active"))
            .array_contains("participants", Some(Uuid::new_v4()));
        push_page(&mut qb, 10, 20);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM conversations WHERE status = $1 AND $2 = ANY(participants) \
             LIMIT $3 OFFSET $4"
        );
    }

    #[test]
    fn test_empty_text_filter_is_ignored() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM users");
        Filters::new(&mut qb).contains_ci("email", Some(""));
        assert_eq!(qb.sql(), "SELECT * FROM users");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
