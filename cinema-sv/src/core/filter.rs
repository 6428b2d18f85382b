use serde::Deserialize;

use crate::core::error::Error;
use crate::core::validate::ValidationErrors;

/// Raw movie list query string.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieQuery {
    pub title: Option<String>,
    pub actors: Option<String>,
    pub genres: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActorToken {
    Id(i32),
    Name(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub actors: Vec<ActorToken>,
    pub genres: Vec<i32>,
}

impl MovieFilter {
    pub fn parse(query: &MovieQuery) -> Result<Self, Error> {
        let title = query.title.as_ref()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let actors: Vec<ActorToken> = query.actors.as_deref()
            .map(|raw| split_values(raw).map(parse_actor_token).collect())
            .unwrap_or_else(Vec::new);

        let mut errors = ValidationErrors::new();
        let mut genres = Vec::new();
        for value in query.genres.as_deref().map(split_values).into_iter().flatten() {
            match value.parse::<i32>() {
                Ok(genre_id) => genres.push(genre_id),
                Err(_) => errors.add("genres", format!("\"{}\" is not a valid genre id.", value)),
            }
        }
        errors.into_result()?;

        Ok(MovieFilter { title, actors, genres })
    }
}

fn split_values(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|v| !v.is_empty())
}

/// All-digit tokens are actor ids, anything else is matched against names.
fn parse_actor_token(value: &str) -> ActorToken {
    if value.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(actor_id) = value.parse() {
            return ActorToken::Id(actor_id);
        }
    }
    ActorToken::Name(value.to_string())
}

/// `ILIKE` pattern matching `value` anywhere, with wildcards in `value` escaped.
pub fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(title: Option<&str>, actors: Option<&str>, genres: Option<&str>) -> MovieQuery {
        MovieQuery {
            title: title.map(String::from),
            actors: actors.map(String::from),
            genres: genres.map(String::from),
        }
    }

    #[test]
    fn actor_tokens_split_into_ids_and_names() {
        let filter = MovieFilter::parse(&query(None, Some("3, Reeves,,12"), None)).unwrap();
        assert_eq!(filter.actors, vec![
            ActorToken::Id(3),
            ActorToken::Name("Reeves".to_string()),
            ActorToken::Id(12),
        ]);
    }

    #[test]
    fn oversized_digit_token_is_a_name() {
        let filter = MovieFilter::parse(&query(None, Some("99999999999"), None)).unwrap();
        assert_eq!(filter.actors, vec![ActorToken::Name("99999999999".to_string())]);
    }

    #[test]
    fn genres_are_ids() {
        let filter = MovieFilter::parse(&query(None, None, Some("1,4"))).unwrap();
        assert_eq!(filter.genres, vec![1, 4]);
    }

    #[test]
    fn non_numeric_genre_is_invalid() {
        match MovieFilter::parse(&query(None, None, Some("1,drama"))) {
            Err(Error::ValidationError(errors)) => assert_eq!(errors.messages("genres").len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn blank_values_do_not_filter() {
        let filter = MovieFilter::parse(&query(Some("  "), Some(""), Some(","))).unwrap();
        assert_eq!(filter, MovieFilter::default());
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("matrix"), "%matrix%");
        assert_eq!(contains_pattern("100%_real\\"), "%100\\%\\_real\\\\%");
    }
}
