//! One-time "what's new" announcements, one per release at most.

use crate::storage::Storage;

/// Dialog copy for a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub version: &'static str,
    pub title: &'static str,
    pub label: &'static str,
    pub body: &'static str,
}

/// Releases that ship an announcement. Other versions show nothing.
pub const ANNOUNCEMENTS: &[Announcement] = &[Announcement {
    version: "1.0.4",
    title: "What's new on Hush ✨",
    label: "Added Sepia mode! 🌅",
    body: "Sepia is now available as a reader theme. Open the theme picker (the paintbrush) and choose Sepia.\n\nKeep the feedback coming!",
}];

/// Storage key of the "seen" flag for `version`.
pub fn seen_key(version: &str) -> String {
    format!("whatsnew_seen_{version}")
}

/// Announcement for `version` if there is one and it has not been seen.
///
/// An unreadable flag counts as not seen.
pub fn pending(storage: &dyn Storage, version: &str) -> Option<&'static Announcement> {
    let announcement = ANNOUNCEMENTS.iter().find(|a| a.version == version)?;

    match storage.get(&seen_key(version)) {
        Ok(Some(flag)) if flag == "1" => None,
        Ok(_) => Some(announcement),
        Err(e) => {
            tracing::warn!(error = %e, version, "could not read announcement flag");
            Some(announcement)
        }
    }
}

/// Records that the announcement for `version` was dismissed.
pub fn mark_seen(storage: &mut dyn Storage, version: &str) {
    if let Err(e) = storage.set(&seen_key(version), "1") {
        tracing::warn!(error = %e, version, "could not store announcement flag");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_known_version_is_pending_once() {
        let mut storage = MemoryStorage::new();

        let announcement = pending(&storage, "1.0.4").unwrap();
        assert!(announcement.label.contains("Sepia"));

        mark_seen(&mut storage, "1.0.4");
        assert!(pending(&storage, "1.0.4").is_none());
        assert_eq!(storage.get("whatsnew_seen_1.0.4").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn test_unknown_version_has_nothing() {
        assert!(pending(&MemoryStorage::new(), "0.9.0").is_none());
    }
}
