use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// A limited-run edition, e.g. "1991 British Racing Green".
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Edition {
    pub id: uuid::Uuid,
    pub year: i32,
    pub name: String,
}

/// Split an edition label into `(year, name)`.
///
/// Labels lead with the model year: `"1991 British Racing Green"` becomes
/// `(1991, "British Racing Green")`. Returns `None` when the label has no
/// leading year or no name after it.
pub fn parse_edition_label(label: &str) -> Option<(i32, &str)> {
    let trimmed = label.trim();
    let (year_part, name_part) = trimmed.split_once(' ')?;
    let year: i32 = year_part.parse().ok()?;
    let name = name_part.trim();
    if name.is_empty() {
        return None;
    }
    Some((year, name))
}

/// Look up an edition by its `(year, name)` natural key.
#[derive(Debug, Clone)]
pub struct GetEditionByYearName {
    pub year: i32,
    pub name: String,
}

impl Processor<GetEditionByYearName> for DatabaseProcessor {
    type Output = Option<Edition>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetEditionByYearName")]
    async fn process(&self, query: GetEditionByYearName) -> Result<Option<Edition>, sqlx::Error> {
        sqlx::query_as::<_, Edition>(
            r#"
            SELECT id, year, name
            FROM editions
            WHERE year = $1 AND name = $2
            "#,
        )
        .bind(query.year)
        .bind(&query.name)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parses_year_and_name() {
        assert_eq!(
            parse_edition_label("1991 British Racing Green"),
            Some((1991, "British Racing Green"))
        );
        assert_eq!(parse_edition_label("  1993 Limited  "), Some((1993, "Limited")));
    }

    #[test]
    fn label_without_year_rejected() {
        assert_eq!(parse_edition_label("British Racing Green"), None);
        assert_eq!(parse_edition_label("1991"), None);
        assert_eq!(parse_edition_label("1991   "), None);
        assert_eq!(parse_edition_label(""), None);
    }
}
