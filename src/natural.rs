use std::cmp::Ordering;

/// The registry of key types whose ordering [`crate::OrderedMap`] may infer
/// on first insertion: primitive numbers ascending, strings
/// lexicographically.
///
/// Any other key type opts in with an empty impl, which registers no
/// ordering; such a map must be built with
/// [`OrderedMap::with_comparator`](crate::OrderedMap::with_comparator),
/// otherwise inserting fails with
/// [`Error::UnconfiguredOrdering`](crate::Error::UnconfiguredOrdering).
///
/// ```
/// use noirmap::{Error, NaturalOrder, OrderedMap};
///
/// #[derive(Debug, PartialEq)]
/// struct Point(i32, i32);
/// impl NaturalOrder for Point {}
///
/// let mut map = OrderedMap::new();
/// assert!(matches!(map.put(Point(0, 1), ()), Err(Error::UnconfiguredOrdering(_))));
///
/// let mut map = OrderedMap::with_comparator(|l: &Point, r: &Point| (l.0, l.1).cmp(&(r.0, r.1)));
/// assert_eq!(Ok(None), map.put(Point(0, 1), ()));
/// ```
pub trait NaturalOrder {
    fn natural_order() -> Option<fn(&Self, &Self) -> Ordering> {
        None
    }
}

macro_rules! ord_natural {
    ($($t:ty),* $(,)?) => {
        $(
            impl NaturalOrder for $t {
                fn natural_order() -> Option<fn(&Self, &Self) -> Ordering> {
                    Some(<$t as Ord>::cmp)
                }
            }
        )*
    };
}

macro_rules! float_natural {
    ($($t:ty),* $(,)?) => {
        $(
            impl NaturalOrder for $t {
                fn natural_order() -> Option<fn(&Self, &Self) -> Ordering> {
                    Some(<$t>::total_cmp)
                }
            }
        )*
    };
}

ord_natural!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, String, Box<str>,
);
float_natural!(f32, f64);

impl NaturalOrder for &str {
    fn natural_order() -> Option<fn(&Self, &Self) -> Ordering> {
        Some(<Self as Ord>::cmp)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn order<T: NaturalOrder>(l: T, r: T) -> Option<Ordering> {
        T::natural_order().map(|cmp| cmp(&l, &r))
    }

    #[test]
    fn numbers_ascend() {
        assert_eq!(Some(Ordering::Less), order(1u8, 2));
        assert_eq!(Some(Ordering::Greater), order(-1i64, -2));
        assert_eq!(Some(Ordering::Less), order(-0.5f64, 0.25));
        assert_eq!(Some(Ordering::Equal), order(7usize, 7));
    }

    #[test]
    fn strings_are_lexicographic() {
        assert_eq!(Some(Ordering::Less), order("apple", "banana"));
        assert_eq!(Some(Ordering::Less), order("B".to_string(), "a".to_string()));
        assert_eq!(Some(Ordering::Greater), order(Box::<str>::from("b"), "a".into()));
    }

    #[test]
    fn unregistered_types_have_none() {
        struct Opaque;
        impl NaturalOrder for Opaque {}
        assert!(Opaque::natural_order().is_none());
    }
}
