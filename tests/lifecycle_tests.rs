mod common;

#[cfg(test)]
pub mod lifecycle_tests {
    use chrono::Duration;

    use super::common::*;

    use civicpress::common::*;
    use civicpress::models::*;
    use civicpress::services::lifecycle::*;
    use civicpress::services::{is_due, is_publicly_visible};

    #[test]
    fn test_publish_now_sets_flag_and_time() {
        let now = at(2026, 3, 1, 9, 30);

        let publication = transition(&PublishIntent::PublishNow, now).unwrap();

        assert!(publication.published);
        assert_eq!(publication.published_at, Some(now));
        assert_eq!(publication.status_at(now), PublicationStatus::Published);
    }

    #[test]
    fn test_save_draft_clears_everything() {
        let now = at(2026, 3, 1, 9, 30);

        let publication = transition(&PublishIntent::SaveDraft, now).unwrap();

        assert_eq!(publication, Publication::DRAFT);
        assert_eq!(publication.status_at(now), PublicationStatus::Draft);
    }

    #[test]
    fn test_schedule_future() {
        let now = at(2026, 3, 1, 9, 30);
        let later = now + Duration::days(2);

        let publication =
            transition(&PublishIntent::Schedule { at: later }, now).unwrap();

        assert!(!publication.published);
        assert_eq!(publication.published_at, Some(later));
        assert_eq!(publication.status_at(now), PublicationStatus::Scheduled);
    }

    #[test]
    fn test_schedule_boundary() {
        let now = at(2026, 3, 1, 9, 30);

        // Exactly now is accepted.
        let publication =
            transition(&PublishIntent::Schedule { at: now }, now).unwrap();
        assert_eq!(publication.published_at, Some(now));

        let just_before = now - Duration::seconds(1);
        let result =
            transition(&PublishIntent::Schedule { at: just_before }, now);
        assert_eq!(
            result,
            Err(ValidationError::ScheduleInPast {
                at: just_before,
                now
            })
        );
    }

    #[test]
    fn test_schedule_yesterday_is_rejected() {
        let now = at(2026, 3, 1, 9, 30);
        let yesterday = now - Duration::days(1);

        let result = transition(&PublishIntent::Schedule { at: yesterday }, now);

        assert!(matches!(
            result,
            Err(ValidationError::ScheduleInPast { .. })
        ));
    }

    #[test]
    fn test_classification_is_total() {
        let now = at(2026, 3, 1, 9, 30);
        let past = Some(now - Duration::hours(1));
        let future = Some(now + Duration::hours(1));

        let cases = [
            (false, None, PublicationStatus::Draft),
            (true, None, PublicationStatus::Published),
            (true, past, PublicationStatus::Published),
            (true, Some(now), PublicationStatus::Published),
            (true, future, PublicationStatus::Scheduled),
            (false, future, PublicationStatus::Scheduled),
            // Due but not yet promoted.
            (false, past, PublicationStatus::Scheduled),
        ];

        for (published, published_at, expected) in cases {
            assert_eq!(
                PublicationStatus::classify(published, published_at, now),
                expected,
                "published={published} published_at={published_at:?}"
            );
        }
    }

    #[test]
    fn test_visibility() {
        let now = at(2026, 3, 1, 9, 30);
        let past = Some(now - Duration::minutes(5));
        let future = Some(now + Duration::minutes(5));

        assert!(!is_publicly_visible(false, None, now));
        assert!(!is_publicly_visible(false, past, now));
        assert!(!is_publicly_visible(false, future, now));
        assert!(is_publicly_visible(true, None, now));
        assert!(is_publicly_visible(true, past, now));
        assert!(is_publicly_visible(true, Some(now), now));
        assert!(!is_publicly_visible(true, future, now));
    }

    #[test]
    fn test_visible_implies_published_status() {
        let now = at(2026, 3, 1, 9, 30);
        let times = [
            None,
            Some(now - Duration::days(1)),
            Some(now),
            Some(now + Duration::days(1)),
        ];

        for published in [false, true] {
            for published_at in times {
                if is_publicly_visible(published, published_at, now) {
                    assert_eq!(
                        PublicationStatus::classify(published, published_at, now),
                        PublicationStatus::Published
                    );
                }
            }
        }
    }

    #[test]
    fn test_due_detection() {
        let now = at(2026, 3, 1, 9, 30);

        assert!(is_due(false, Some(now), now));
        assert!(is_due(false, Some(now - Duration::seconds(1)), now));
        assert!(!is_due(false, Some(now + Duration::seconds(1)), now));
        assert!(!is_due(false, None, now));
        assert!(!is_due(true, Some(now - Duration::days(1)), now));
    }

    #[test]
    fn test_promote_keeps_go_live_time() {
        let now = at(2026, 3, 1, 9, 30);
        let scheduled_for = now - Duration::minutes(1);

        let promoted = promote(
            Publication {
                published: false,
                published_at: Some(scheduled_for),
            },
            now,
        );

        assert_eq!(
            promoted,
            Publication {
                published: true,
                published_at: Some(scheduled_for),
            }
        );
        assert!(is_publicly_visible(
            promoted.published,
            promoted.published_at,
            now
        ));

        // Not due yet, or nothing to promote.
        let future = Publication {
            published: false,
            published_at: Some(now + Duration::minutes(1)),
        };
        assert_eq!(promote(future, now), future);
        assert_eq!(promote(Publication::DRAFT, now), Publication::DRAFT);
    }

    #[test]
    fn test_bulk_publication_pairs() {
        assert_eq!(
            bulk_publication(BulkAction::Publish),
            Some(Publication {
                published: true,
                published_at: None,
            })
        );
        assert_eq!(
            bulk_publication(BulkAction::Unpublish),
            Some(Publication::DRAFT)
        );
        assert_eq!(bulk_publication(BulkAction::Delete), None);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(PublicationStatus::Draft.label(), "Koncept");
        assert_eq!(PublicationStatus::Scheduled.label(), "Naplánováno");
        assert_eq!(PublicationStatus::Published.label(), "Publikováno");

        assert_eq!(
            "Scheduled".parse::<PublicationStatus>(),
            Ok(PublicationStatus::Scheduled)
        );
        assert!("live".parse::<PublicationStatus>().is_err());
        assert!(PublicationStatus::Published == "published");
    }

    #[test]
    fn test_seed_statuses() {
        let now = parse_time("2026-02-01 00:00:00+00");

        assert_eq!(get_seed_draft().status_at(now), PublicationStatus::Draft);
        assert_eq!(
            get_seed_published().status_at(now),
            PublicationStatus::Published
        );
        assert_eq!(
            get_seed_scheduled().status_at(now),
            PublicationStatus::Scheduled
        );
        assert_eq!(get_seed_due().status_at(now), PublicationStatus::Scheduled);

        assert!(get_seed_published().is_visible_at(now));
        assert!(!get_seed_due().is_visible_at(now));
    }
}
