//! Identity by string token.
//!
//! Inputs are matched by the token the platform echoes back (command name,
//! component id, modal id) rather than by object identity, so a button can be
//! rebuilt every time it is displayed and still route to the action that owns
//! it.

/// Anything that can claim ownership of a string token.
pub trait Identifiable {
    /// Whether this identifies with `token`. Case-insensitive.
    fn identify(&self, token: &str) -> bool;
}

impl<T: Identifiable + ?Sized> Identifiable for &T {
    fn identify(&self, token: &str) -> bool {
        (**self).identify(token)
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Box<T> {
    fn identify(&self, token: &str) -> bool {
        (**self).identify(token)
    }
}

impl<T: Identifiable + ?Sized> Identifiable for std::sync::Arc<T> {
    fn identify(&self, token: &str) -> bool {
        (**self).identify(token)
    }
}

/// Unicode-aware case-insensitive comparison.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.eq_ignore_ascii_case(b) {
        return true;
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// The first identifiable claiming `token`.
pub fn identify_first<'a, I, T>(identifiables: I, token: &str) -> Option<&'a T>
where
    I: IntoIterator<Item = &'a T>,
    T: Identifiable + 'a,
{
    identifiables
        .into_iter()
        .find(|identifiable| identifiable.identify(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Id(&'static str);

    impl Identifiable for Id {
        fn identify(&self, token: &str) -> bool {
            eq_ignore_case(self.0, token)
        }
    }

    #[test]
    fn case_insensitive() {
        assert!(eq_ignore_case("PlayNow", "playnow"));
        assert!(eq_ignore_case("ÅPEN", "åpen"));
        assert!(!eq_ignore_case("play", "pause"));
        assert!(!eq_ignore_case("play", "play "));
    }

    #[test]
    fn first_match_wins() {
        let items = [Id("a"), Id("b"), Id("B")];
        let found = identify_first(&items, "b").map(|id| id.0);
        assert_eq!(found, Some("b"));
        assert!(identify_first(&items, "c").is_none());
    }
}
