//! Parser for JSON documents.

use chumsky::prelude::*;

use crate::Spanned;

/// A parsed JSON value.
///
/// Composite values hold [`Spanned`] children, so every subtree can be
/// reported against the source text it came from.
#[derive(Clone, Debug, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Str(String),
    Num(f64),
    Array(Vec<Spanned<Json>>),
    Object(Vec<(Spanned<String>, Spanned<Json>)>),
}

impl Json {
    pub fn kind_desc(&self) -> &'static str {
        match self {
            Json::Null => "null",
            Json::Bool(_) => "bool",
            Json::Str(_) => "string",
            Json::Num(_) => "number",
            Json::Array(_) => "array",
            Json::Object(_) => "object",
        }
    }

    /// Converts the parse tree into a [`serde_json::Value`].
    ///
    /// Duplicate object keys collapse here: the member keeps its first
    /// position while the last value wins.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Json::Null => serde_json::Value::Null,
            Json::Bool(b) => serde_json::Value::Bool(*b),
            Json::Str(s) => serde_json::Value::String(s.clone()),
            Json::Num(n) => number_value(*n),
            Json::Array(items) => {
                serde_json::Value::Array(items.iter().map(|item| item.val.to_value()).collect())
            }
            Json::Object(members) => {
                let mut map = serde_json::Map::new();
                for (key, value) in members {
                    map.insert(key.val.clone(), value.val.to_value());
                }
                serde_json::Value::Object(map)
            }
        }
    }

    /// Renders the value for display next to a node label.
    ///
    /// Strings appear without quotes; everything else uses its compact JSON
    /// form.
    pub fn display_value(&self) -> String {
        match self {
            Json::Str(s) => s.clone(),
            other => other.to_value().to_string(),
        }
    }
}

/// Renders `n` as an integer when it is one. `9007199254740992` is the
/// largest integer a JSON number represents exactly.
fn number_value(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= 9_007_199_254_740_992.0 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Taken from: <https://github.com/zesterer/chumsky/blob/main/examples/json.rs>.
pub fn parser<'a>() -> impl Parser<'a, &'a str, Spanned<Json>, extra::Err<Rich<'a, char>>> {
    recursive(|value| {
        let digits = text::digits(10).to_slice();

        let frac = just('.').then(digits);

        let exp = just('e')
            .or(just('E'))
            .then(one_of("+-").or_not())
            .then(digits)
            .labelled("exponent");

        let number = just('-')
            .or_not()
            .then(text::int(10))
            .then(frac.or_not())
            .then(exp.or_not())
            .to_slice()
            .map(|s: &str| s.parse().unwrap())
            .boxed()
            .labelled("number");

        let escape = just('\\')
            .ignore_then(choice((
                just('\\'),
                just('/'),
                just('"'),
                just('b').to('\x08'),
                just('f').to('\x0C'),
                just('n').to('\n'),
                just('r').to('\r'),
                just('t').to('\t'),
                just('u').ignore_then(text::digits(16).exactly(4).to_slice().validate(
                    |digits, e, emitter| {
                        char::from_u32(u32::from_str_radix(digits, 16).unwrap()).unwrap_or_else(
                            || {
                                emitter.emit(Rich::custom(e.span(), "invalid unicode character"));
                                '\u{FFFD}' // unicode replacement character
                            },
                        )
                    },
                )),
            )))
            .boxed()
            .labelled("escape character");

        let string = none_of("\\\"")
            .or(escape)
            .repeated()
            .collect::<String>()
            .delimited_by(just('"'), just('"'))
            .boxed()
            .labelled("string");

        let array = value
            .clone()
            .separated_by(just(',').padded())
            .collect()
            .padded()
            .delimited_by(just('['), just(']'))
            .boxed()
            .labelled("array");

        let member = string
            .clone()
            .map_with(|val, e| Spanned {
                span: e.span(),
                val,
            })
            .then_ignore(just(':').padded())
            .then(value)
            .labelled("object member");
        let object = member
            .separated_by(just(',').padded())
            .collect()
            .padded()
            .delimited_by(just('{'), just('}'))
            .boxed()
            .labelled("object");

        choice((
            just("null").to(Json::Null).labelled("null"),
            just("true").to(Json::Bool(true)).labelled("true"),
            just("false").to(Json::Bool(false)).labelled("false"),
            number.map(Json::Num),
            string.map(Json::Str),
            array.map(Json::Array),
            object.map(Json::Object),
        ))
        .map_with(|val, e| Spanned {
            span: e.span(),
            val,
        })
        .padded()
    })
    .labelled("JSON value")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(src: &str) -> Spanned<Json> {
        parser()
            .parse(src)
            .into_result()
            .unwrap_or_else(|errs| panic!("failed to parse {src:?}: {errs:?}"))
    }

    #[test]
    fn literals() {
        assert_eq!(parse("null").val, Json::Null);
        assert_eq!(parse("true").val, Json::Bool(true));
        assert_eq!(parse("false").val, Json::Bool(false));
        assert_eq!(parse("0").val, Json::Num(0.0));
        assert_eq!(parse("-12.5e2").val, Json::Num(-1250.0));
        assert_eq!(parse(r#""hi""#).val, Json::Str("hi".to_owned()));
    }

    #[test]
    fn string_escapes() {
        assert_eq!(parse(r#""a\nb""#).val, Json::Str("a\nb".to_owned()));
        assert_eq!(parse(r#""A""#).val, Json::Str("A".to_owned()));
        assert_eq!(parse(r#""q\"q""#).val, Json::Str("q\"q".to_owned()));
        assert_eq!(parse(r#""\\""#).val, Json::Str("\\".to_owned()));
    }

    #[test]
    fn arrays_preserve_order() {
        let Json::Array(items) = parse(r#"[1, "two", null]"#).val else {
            panic!("expected an array");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].val, Json::Num(1.0));
        assert_eq!(items[1].val, Json::Str("two".to_owned()));
        assert_eq!(items[2].val, Json::Null);
    }

    #[test]
    fn objects_preserve_member_order_and_duplicates() {
        let Json::Object(members) = parse(r#"{"b": 1, "a": 2, "b": 3}"#).val else {
            panic!("expected an object");
        };
        let keys: Vec<_> = members.iter().map(|(k, _)| k.val.as_str()).collect();
        assert_eq!(keys, ["b", "a", "b"]);
    }

    #[test]
    fn spans_cover_the_source_text() {
        let doc = parse(r#"  {"a": 1}  "#);
        assert_eq!(doc.span.start, 2);
        assert_eq!(doc.span.end, 10);
    }

    #[test]
    fn rejects_malformed_documents() {
        for src in ["", "{", "tru", r#"{"a":}"#, "[1 2]"] {
            assert!(
                parser().parse(src).into_result().is_err(),
                "{src:?} should not parse"
            );
        }
    }

    #[test]
    fn to_value_collapses_duplicate_keys() {
        let doc = parse(r#"{"a": 1, "b": 2, "a": 3}"#);
        assert_eq!(doc.val.to_value(), json!({"a": 3, "b": 2}));
    }

    #[test]
    fn to_value_keeps_integers_whole() {
        assert_eq!(parse("42").val.to_value(), json!(42));
        assert_eq!(parse("-7").val.to_value(), json!(-7));
        assert_eq!(parse("1.5").val.to_value(), json!(1.5));
    }

    #[test]
    fn display_values() {
        assert_eq!(parse(r#""hi""#).val.display_value(), "hi");
        assert_eq!(parse("1").val.display_value(), "1");
        assert_eq!(parse("1.5").val.display_value(), "1.5");
        assert_eq!(parse("true").val.display_value(), "true");
        assert_eq!(parse("null").val.display_value(), "null");
        assert_eq!(
            parse(r#"{"a": [1, 2]}"#).val.display_value(),
            r#"{"a":[1,2]}"#
        );
    }
}
