#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a `TagRule` from a key, a value pattern (`*`, `!`, `~` or a literal)
/// and a non-capturing effect body.
///
/// ```ignore
/// tag_rule!("oneway", "-1", |q: Qualifiers, _tag| {
///     q.flags |= QualifierFlags::ONEWAY;
///     q.reverse_geometry = true;
/// })
/// ```
#[macro_export]
macro_rules! tag_rule {
    ($key:literal, $value:literal, |$ctx:ident : $ctx_ty:ty, $tag:ident| $body:expr $(,)?) => {
        $crate::TagRule::<$ctx_ty> {
            key: $key,
            value: $crate::ValuePattern::parse($value),
            effect: |$ctx: &mut $ctx_ty, $tag: &mut $crate::Tag| {
                $body;
            },
        }
    };
}
