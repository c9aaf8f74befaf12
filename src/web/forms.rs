use serde::Deserialize;
use uuid::Uuid;

use civicpress::models::{ArticleQuery, BulkAction, PublicationStatus};

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Admin listing filters from the query string.
#[derive(Deserialize)]
pub struct ArticlesQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
    pub status: Option<PublicationStatus>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl From<ArticlesQuery> for ArticleQuery {
    fn from(query: ArticlesQuery) -> Self {
        let non_empty = |s: Option<String>| {
            s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        ArticleQuery {
            category: non_empty(query.category),
            tag: non_empty(query.tag),
            search: non_empty(query.q),
            status: query.status,
            visible_only: false,
            offset: query.offset,
            limit: query.limit,
        }
    }
}

#[derive(Deserialize)]
pub struct PublicArticlesQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkForm {
    pub ids: Vec<Uuid>,
    pub action: BulkAction,
}
