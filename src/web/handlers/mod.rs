pub mod admin_pages;
pub mod articles;
pub mod auth;
pub mod categories;
pub mod public;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    public::configure(cfg);
    auth::configure(cfg);
    articles::configure(cfg);
    categories::configure(cfg);
    admin_pages::configure(cfg);
}
