use askama::Template;
use chrono::{DateTime, Utc};

use civicpress::models::{Article, PublicationStatus};

pub struct ArticleRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: PublicationStatus,
    pub published_at: String,
    pub updated_at: String,
}

impl ArticleRow {
    pub fn from_article(article: &Article, now: DateTime<Utc>) -> Self {
        Self {
            id: article.id.to_string(),
            title: article.title.clone(),
            category: article.category.clone(),
            status: article.status_at(now),
            published_at: article
                .published_at
                .map(|at| at.format("%d.%m.%Y %H:%M").to_string())
                .unwrap_or_default(),
            updated_at: article.updated_at.format("%d.%m.%Y %H:%M").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/articles.html")]
pub struct AdminArticlesTemplate {
    pub rows: Vec<ArticleRow>,
    pub query: String,
    pub admin_email: String,
}
