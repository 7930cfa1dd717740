//! Session ownership for a single load.

/// Who owns the warehouse session used by a load.
///
/// With [`Connection::Owned`] the loader connects, and closes the session on
/// every exit path. With [`Connection::Borrowed`] the caller keeps ownership;
/// the loader only issues statements on it and never closes it.
pub enum Connection<'a, S> {
    Owned,
    Borrowed(&'a mut S),
}

impl<S> std::fmt::Debug for Connection<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Connection::Owned => f.write_str("Owned"),
            Connection::Borrowed(_) => f.write_str("Borrowed"),
        }
    }
}
