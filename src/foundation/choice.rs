use crate::foundation::error::{OverwriteError, OverwriteResult};

/// A closed set of named values that the host exchanges as plain strings.
pub trait Choice: Copy + 'static {
    /// Human-readable name of the parameter, used in error messages.
    const KIND: &'static str;
    /// Every variant, in the order the host lists them.
    const ALL: &'static [Self];

    /// The host's spelling of this variant.
    fn spelling(self) -> &'static str;
}

/// Case-insensitive lookup of `s` among `T::ALL`.
pub fn parse_choice<T: Choice>(s: &str) -> OverwriteResult<T> {
    let needle = s.trim();
    T::ALL
        .iter()
        .copied()
        .find(|c| c.spelling().eq_ignore_ascii_case(needle))
        .ok_or_else(|| {
            let expected: Vec<&str> = T::ALL.iter().map(|c| c.spelling()).collect();
            OverwriteError::validation(format!(
                "unknown {} '{s}' (expected one of: {})",
                T::KIND,
                expected.join(", ")
            ))
        })
}

/// Implement `Display` and `FromStr` through [`Choice`].
macro_rules! choice_str_impls {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::foundation::choice::Choice::spelling(*self))
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::foundation::error::OverwriteError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::foundation::choice::parse_choice(s)
            }
        }
    };
}

pub(crate) use choice_str_impls;
