//! Short identifier helpers for log correlation.

use uuid::Uuid;

const MAX_LEN: usize = 12;

/// Generates a short lowercase-hex identifier, at most 12 characters.
#[must_use]
pub fn short_id(length: usize) -> String {
    let length = length.clamp(1, MAX_LEN);
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(length);
    id
}

/// A framework-tagged short identifier (`dyn_<hex>`), used for boot ids.
#[must_use]
pub fn tagged_id() -> String {
    format!("dyn_{}", short_id(MAX_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_respects_length_bounds() {
        assert_eq!(short_id(8).len(), 8);
        assert_eq!(short_id(100).len(), MAX_LEN);
        assert_eq!(short_id(0).len(), 1);
    }

    #[test]
    fn tagged_id_carries_the_prefix() {
        let id = tagged_id();
        assert!(id.starts_with("dyn_"));
        assert_eq!(id.len(), "dyn_".len() + MAX_LEN);
    }

    #[test]
    fn ids_are_unique_enough() {
        let a = short_id(12);
        let b = short_id(12);
        assert_ne!(a, b);
    }
}
