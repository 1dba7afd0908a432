use chumsky::span::SimpleSpan;
use serde::Deserialize;

/// A value paired with the span of source text it was parsed from.
///
/// Equality and ordering look only at the value, so parsed documents can be compared
/// structurally without caring where in the input each piece came from.
#[derive(Debug, Eq, Deserialize, Clone)]
pub struct Spanned<T> {
    #[serde(skip_serializing)]
    pub span: SimpleSpan<usize>,
    pub val: T,
}

impl<T: PartialEq> PartialEq for Spanned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.val == other.val
    }
}

impl<T: PartialOrd> PartialOrd for Spanned<T> {
    fn partial_cmp(&self, other: &Spanned<T>) -> Option<std::cmp::Ordering> {
        self.val.partial_cmp(&other.val)
    }
}

impl<T: Ord> Ord for Spanned<T> {
    fn cmp(&self, other: &Spanned<T>) -> std::cmp::Ordering {
        self.val.cmp(&other.val)
    }
}
