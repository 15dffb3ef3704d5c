use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The cursor has no current element: `next` was not called since the
    /// last `remove`, or not called at all.
    #[error("cursor has no current element to remove")]
    InvalidState,
    /// The cursor is past its last element.
    #[error("cursor has no next element")]
    NotFound,
    /// No comparator was supplied and the key type has no natural ordering.
    #[error("no ordering configured for key type `{0}`")]
    UnconfiguredOrdering(&'static str),
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages() {
        assert_eq!(
            "cursor has no current element to remove",
            Error::InvalidState.to_string()
        );
        assert_eq!("cursor has no next element", Error::NotFound.to_string());
        assert_eq!(
            "no ordering configured for key type `u8`",
            Error::UnconfiguredOrdering("u8").to_string()
        );
    }
}
