//! Registry names for imported meshes and materials.
//!
//! Names are derived from the document id of the source object and an
//! index, so importing the same document twice produces the same keys.

use sha1::{Digest, Sha1};

/// Number of readable characters kept from `"<id>-<index>"`.
const READABLE_PREFIX: usize = 10;

/// Number of hex digits of the SHA-1 digest appended to the prefix.
const DIGEST_PREFIX: usize = 10;

/// Build the registry name for `object_id` at `index`.
///
/// The name is the first 10 characters of `"<id>-<index>"` followed by the
/// first 10 hex digits of the SHA-1 of that string. For ids long enough to
/// fill the readable prefix the result is always 20 characters.
///
/// # Example
///
/// ```
/// use daeport_core::naming::import_name;
///
/// let name = import_name("CubeGeometry", 0);
/// assert_eq!(name.len(), 20);
/// assert!(name.starts_with("CubeGeomet"));
/// ```
pub fn import_name(object_id: &str, index: usize) -> String {
    let base = format!("{}-{}", object_id, index);
    let digest = format!("{:x}", Sha1::digest(base.as_bytes()));

    let mut name: String = base.chars().take(READABLE_PREFIX).collect();
    name.push_str(&digest[..DIGEST_PREFIX]);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_deterministic() {
        assert_eq!(import_name("Suzanne-mesh", 3), import_name("Suzanne-mesh", 3));
    }

    #[test]
    fn test_name_layout() {
        let name = import_name("Cube-mesh", 0);

        // "Cube-mesh-0" is 11 characters, only the first 10 are kept
        assert_eq!(name.len(), 20);
        assert_eq!(&name[..10], "Cube-mesh-");
        assert!(name[10..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_known_digests() {
        // sha1("Cube-mesh-0") = 2660e2f29260f2974b7f...
        assert_eq!(import_name("Cube-mesh", 0), "Cube-mesh-2660e2f292");
        // sha1("abc-0") = 1ab73a42ff092b18b32c...
        assert_eq!(import_name("abc", 0), "abc-01ab73a42ff");
    }

    #[test]
    fn test_index_disambiguates_long_ids() {
        // Same readable prefix, different digests
        let a = import_name("VeryLongGeometryIdentifier", 0);
        let b = import_name("VeryLongGeometryIdentifier", 1);

        assert_eq!(&a[..10], &b[..10]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_id_keeps_full_base() {
        let name = import_name("m", 7);
        assert!(name.starts_with("m-7"));
        assert_eq!(name.len(), 3 + 10);
    }

    #[test]
    fn test_non_ascii_ids() {
        let name = import_name("géométrie-principale", 0);
        assert_eq!(name.chars().count(), 20);
        assert!(name.starts_with("géométrie-"));
    }
}
