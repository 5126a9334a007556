//! Core types for the virtual file system.

/// NodeId: process-unique identifier assigned when a node is created, never reused
pub type NodeId = uuid::Uuid;

/// Timestamp: UTC wall-clock instant stamped on nodes
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Path separator used by every VFS path
pub const SEPARATOR: char = '/';

/// Canonical path of the root folder
pub const ROOT_PATH: &str = "/";

/// Current UTC time, never earlier than `previous`.
///
/// Keeps `modified_at` monotonic even if the wall clock steps backwards.
pub fn now_after(previous: Timestamp) -> Timestamp {
    let now = chrono::Utc::now();
    if now < previous {
        previous
    } else {
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_now_after_never_goes_backwards() {
        let future = chrono::Utc::now() + Duration::hours(1);
        assert_eq!(now_after(future), future);

        let past = chrono::Utc::now() - Duration::hours(1);
        assert!(now_after(past) > past);
    }
}
