use uuid::Uuid;

/// Generate a unique identifier for habits, tasks, timer logs and events.
///
/// The stored documents only require ids to be unique strings, so random
/// UUIDs are used rather than creation timestamps (two entries created in
/// the same millisecond must not collide).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }
}
