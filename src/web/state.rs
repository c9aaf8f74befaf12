use std::sync::Arc;

use civicpress::db::Database;
use civicpress::services::{ArticleService, LoginThrottle};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub articles: ArticleService<Database>,
    pub login_throttle: Arc<LoginThrottle>,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(db: Database, cookie_secure: bool) -> Self {
        let articles = ArticleService::new(Arc::new(db.clone()));

        Self {
            db,
            articles,
            login_throttle: Arc::new(LoginThrottle::default()),
            cookie_secure,
        }
    }
}
