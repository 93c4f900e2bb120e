//! Publish-timestamp resolution for editorial posts.

use chrono::{DateTime, Utc};

/// Resolve the `published_at` value for a post save.
///
/// - An explicit timestamp always wins.
/// - Otherwise the first transition into `active` stamps `now`.
/// - Otherwise the prior value (including none, for drafts) is
///   preserved; re-saving a published post never shifts its publish
///   time.
pub fn resolve_published_at(
    explicit: Option<DateTime<Utc>>,
    new_status: &str,
    prior_status: &str,
    prior_published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if let Some(ts) = explicit {
        return Some(ts);
    }
    if new_status == "active" && prior_status != "active" && prior_published_at.is_none() {
        return Some(now);
    }
    prior_published_at
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn explicit_timestamp_wins() {
        let now = Utc::now();
        let explicit = now - Duration::days(3);
        assert_eq!(
            resolve_published_at(Some(explicit), "draft", "draft", None, now),
            Some(explicit)
        );
        // Even over an existing stamp.
        assert_eq!(
            resolve_published_at(Some(explicit), "active", "active", Some(now), now),
            Some(explicit)
        );
    }

    #[test]
    fn first_activation_stamps_now() {
        let now = Utc::now();
        assert_eq!(
            resolve_published_at(None, "active", "draft", None, now),
            Some(now)
        );
    }

    #[test]
    fn resave_of_published_post_preserves_stamp() {
        let now = Utc::now();
        let original = now - Duration::days(10);
        assert_eq!(
            resolve_published_at(None, "active", "active", Some(original), now),
            Some(original)
        );
    }

    #[test]
    fn draft_stays_unpublished() {
        let now = Utc::now();
        assert_eq!(resolve_published_at(None, "draft", "draft", None, now), None);
    }

    #[test]
    fn reactivation_preserves_prior_stamp() {
        // archived -> active with an existing stamp keeps it.
        let now = Utc::now();
        let original = now - Duration::days(30);
        assert_eq!(
            resolve_published_at(None, "active", "archived", Some(original), now),
            Some(original)
        );
    }
}
