/// Kotlin style scope functions, handy at the end of long method chains.
pub trait LetAlso: Sized {
    fn let_owned<R, F>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> LetAlso for T {}

#[cfg(test)]
mod tests {
    use super::LetAlso;

    #[test]
    fn let_owned_maps_value() {
        let len = vec![1, 2, 3].let_owned(|v| v.len());
        assert_eq!(len, 3);
    }
}
