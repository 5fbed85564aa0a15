//! Entry naming.

/// Build the map key for a `(service, user)` pair: `"<service>:<user>"`.
///
/// Neither part is escaped, so `("a:b", "c")` and `("a", "b:c")` share a
/// key. Stores written by earlier versions rely on this exact shape.
pub fn entry_key(service: &str, user: &str) -> String {
    format!("{service}:{user}")
}
