mod common;

#[cfg(test)]
pub mod db_tests {
    use chrono::{Duration, Utc};
    use sqlx::PgPool;
    use uuid::Uuid;

    use super::common::*;

    use civicpress::common::*;
    use civicpress::db::*;
    use civicpress::models::*;
    use civicpress::services::*;

    const TIME_LIMIT: i64 = 1;

    fn store(pool: PgPool) -> Database {
        Database::from_pool(pool)
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_migration_integrity(pool: PgPool) {
        let db = store(pool.clone());

        for seed in [
            get_seed_draft(),
            get_seed_published(),
            get_seed_scheduled(),
            get_seed_due(),
        ] {
            assert_eq!(db.get_article(seed.id).await.unwrap(), seed);
        }

        let missing = get_seed_nonexisting();
        assert!(matches!(
            db.get_article(missing.id).await,
            Err(ArticleError::NotFound(id)) if id == missing.id
        ));

        let admin = get_admin_by_email(&pool, "ADMIN@test.com")
            .await
            .unwrap();
        assert_eq!(admin, Some(get_seed_admin()));
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_create_article(pool: PgPool) {
        let service = ArticleService::new(std::sync::Arc::new(store(pool)));
        let now = Utc::now();

        let draft = ArticleDraft {
            tags: vec!["doprava".into(), " mhd ".into(), "doprava".into()],
            intent: Some(PublishIntent::PublishNow),
            ..sample_draft()
        };
        let article = service.create(draft, now).await.unwrap();

        assert_eq!(article.title, "Uzavírka Masarykovy ulice");
        assert_eq!(article.tags, vec!["doprava", "mhd"]);
        assert!(article.published);
        assert!(
            (article.created_at - now).num_seconds().abs() <= TIME_LIMIT,
            "created_at not close to now"
        );

        let fetched = service.get(article.id).await.unwrap();
        assert_eq!(fetched, article);
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_list_articles_filters(pool: PgPool) {
        let db = store(pool);
        let now = parse_time("2026-02-01 00:00:00+00");

        let all = db.list_articles(&ArticleQuery::default(), now).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            vec![
                get_seed_due().id,
                get_seed_scheduled().id,
                get_seed_published().id,
                get_seed_draft().id,
            ]
        );

        let public = db
            .list_articles(&ArticleQuery::public(None), now)
            .await
            .unwrap();
        assert_eq!(public, vec![get_seed_published()]);

        for (status, expected) in [
            (PublicationStatus::Draft, 1),
            (PublicationStatus::Scheduled, 2),
            (PublicationStatus::Published, 1),
        ] {
            let query = ArticleQuery {
                status: Some(status),
                ..Default::default()
            };
            let found = db.list_articles(&query, now).await.unwrap();
            assert_eq!(found.len(), expected, "status {status}");
            assert!(found.iter().all(|a| a.status_at(now) == status));
        }

        let tagged = ArticleQuery {
            tag: Some("mhd".to_string()),
            ..Default::default()
        };
        assert_eq!(
            db.list_articles(&tagged, now).await.unwrap(),
            vec![get_seed_published()]
        );

        // LIKE wildcards in the search term are literal.
        let wildcard = ArticleQuery {
            search: Some("%".to_string()),
            ..Default::default()
        };
        assert!(db.list_articles(&wildcard, now).await.unwrap().is_empty());

        let page = ArticleQuery {
            offset: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            db.list_articles(&page, now).await.unwrap(),
            vec![get_seed_draft()]
        );
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_article_partial(pool: PgPool) {
        let db = store(pool);
        let seed = get_seed_published();

        let update = ArticleUpdate {
            excerpt: Some("nový perex".to_string()),
            image_url: Some("https://example.org/b.jpg".to_string()),
            ..Default::default()
        };
        let updated = db.update_article(seed.id, &update).await.unwrap();

        assert_eq!(updated.excerpt, "nový perex");
        assert_eq!(updated.title, seed.title);
        assert_eq!(updated.publication(), seed.publication());
        assert!(updated.updated_at > seed.updated_at);

        let clear = ArticleUpdate {
            image_url: Some(String::new()),
            publication: Some(Publication::DRAFT),
            ..Default::default()
        };
        let cleared = db.update_article(seed.id, &clear).await.unwrap();
        assert_eq!(cleared.image_url, None);
        assert_eq!(cleared.publication(), Publication::DRAFT);
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_update_article_fails_when_all_fields_none(pool: PgPool) {
        let db = store(pool);

        let result = db
            .update_article(get_seed_draft().id, &ArticleUpdate::default())
            .await;

        assert!(matches!(result, Err(ArticleError::InvalidRequest(_))));
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_set_publication_and_delete(pool: PgPool) {
        let db = store(pool);
        let now = Utc::now();
        let id = get_seed_draft().id;
        let at = now + Duration::days(1);

        let scheduled = db
            .set_publication(
                id,
                Publication {
                    published: false,
                    published_at: Some(at),
                },
            )
            .await
            .unwrap();
        assert_eq!(scheduled.status_at(now), PublicationStatus::Scheduled);

        let deleted = db.delete_article(id).await.unwrap();
        assert_eq!(deleted.id, id);
        assert!(matches!(
            db.get_article(id).await,
            Err(ArticleError::NotFound(_))
        ));
        assert!(matches!(
            db.delete_article(id).await,
            Err(ArticleError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_promote_due_articles(pool: PgPool) {
        let db = store(pool);
        let now = parse_time("2026-02-01 00:00:00+00");

        let promoted = promote_due(&db, now).await.unwrap();
        assert_eq!(promoted, vec![get_seed_due().id]);

        let due = db.get_article(get_seed_due().id).await.unwrap();
        assert!(due.published);
        assert_eq!(due.published_at, get_seed_due().published_at);

        let scheduled = db.get_article(get_seed_scheduled().id).await.unwrap();
        assert_eq!(scheduled.publication(), get_seed_scheduled().publication());

        assert!(promote_due(&db, now).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_bulk_delete_keeps_earlier_changes(pool: PgPool) {
        let service = ArticleService::new(std::sync::Arc::new(store(pool)));
        let missing = get_seed_nonexisting().id;
        let ids = vec![get_seed_draft().id, missing, get_seed_due().id];

        let outcome = service.bulk_delete(&ids).await.unwrap();

        assert_eq!(outcome.applied, vec![ids[0]]);
        assert_eq!(outcome.failed.as_ref().map(|f| f.id), Some(missing));
        assert_eq!(outcome.skipped, vec![ids[2]]);

        assert!(service.get(ids[0]).await.is_err());
        assert!(service.get(ids[2]).await.is_ok());
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_categories(pool: PgPool) {
        let active = list_categories(&pool, true).await.unwrap();
        let names: Vec<&str> = active.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Doprava", "Školství"]);

        assert_eq!(list_categories(&pool, false).await.unwrap().len(), 3);

        let created = create_category(
            &pool,
            &CategoryCreate {
                name: "Kultura".to_string(),
                slug: "kultura".to_string(),
                color: "#bf3989".to_string(),
                display_order: 4,
                active: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(
            get_category_by_id(&pool, created.id).await.unwrap(),
            created
        );

        let duplicate = create_category(
            &pool,
            &CategoryCreate {
                name: "Doprava".to_string(),
                slug: "doprava-2".to_string(),
                color: "#000000".to_string(),
                display_order: 5,
                active: true,
            },
        )
        .await;
        assert!(matches!(duplicate, Err(CategoryError::AlreadyExists(_))));

        let updated = update_category(
            &pool,
            created.id,
            &CategoryUpdate {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!updated.active);
        assert_eq!(updated.slug, "kultura");

        let empty =
            update_category(&pool, created.id, &CategoryUpdate::default()).await;
        assert!(matches!(empty, Err(CategoryError::InvalidRequest(_))));

        delete_category(&pool, created.id).await.unwrap();
        assert!(matches!(
            get_category_by_id(&pool, created.id).await,
            Err(CategoryError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./tests/migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_login_and_sessions(pool: PgPool) {
        let now = Utc::now();
        let email = "redakce@obec.cz";
        let password = "Tajne-Heslo-2026";

        assert!(ensure_admin(&pool, email, password).await.unwrap());
        assert!(!ensure_admin(&pool, email, password).await.unwrap());

        assert!(matches!(
            login(&pool, email, "spatne-heslo", now).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            login(&pool, "nikdo@obec.cz", password, now).await,
            Err(AuthError::InvalidCredentials)
        ));

        let session = login(&pool, email, password, now).await.unwrap();
        assert!(session.expires_at > now);

        let admin = admin_for_session(&pool, session.token, now).await.unwrap();
        assert_eq!(admin.email, email);

        // Past its expiry the token no longer resolves.
        assert!(matches!(
            admin_for_session(&pool, session.token, session.expires_at).await,
            Err(AuthError::Unauthorized)
        ));
        assert_eq!(
            purge_expired_sessions(&pool, session.expires_at).await.unwrap(),
            1
        );

        let session = login(&pool, email, password, now).await.unwrap();
        logout(&pool, session.token).await.unwrap();
        assert!(matches!(
            admin_for_session(&pool, session.token, now).await,
            Err(AuthError::Unauthorized)
        ));
    }
}
