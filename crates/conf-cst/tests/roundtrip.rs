//! Property tests: whatever parses must write back out unchanged.

use conf_cst::{Node, StringValue, Value, parse};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./:@-]{1,8}"
}

fn quoted() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-z {}=;,#']",
        Just(r"\n".to_owned()),
        Just(r"\t".to_owned()),
        Just(r#"\""#.to_owned()),
        Just(r"\\".to_owned()),
        Just(r"\u0041".to_owned()),
        Just(r"\u12".to_owned()),
    ];
    prop::collection::vec(piece, 0..6).prop_map(|pieces| format!("\"{}\"", pieces.concat()))
}

fn string() -> impl Strategy<Value = String> {
    prop_oneof![word(), quoted()]
}

fn ws() -> impl Strategy<Value = String> {
    "[ \t\r\n]{1,3}"
}

/// Ends a pair so the next fragment cannot be read as a chained `=`.
fn pair_end() -> impl Strategy<Value = String> {
    prop_oneof![Just("\n".to_owned()), Just(";".to_owned()), Just(" ,".to_owned())]
}

fn item() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        string(),
        ws(),
        "#[a-z {}=]{0,6}\n",
        "[;,]",
        (string(), "[ ]{0,2}", "[ ]{0,2}", string(), pair_end())
            .prop_map(|(k, ws1, ws2, v, end)| format!("{k}{ws1}={ws2}{v}{end}")),
    ];

    leaf.prop_recursive(3, 48, 6, |inner| {
        prop_oneof![
            block(inner.clone()),
            (string(), block(inner), pair_end())
                .prop_map(|(k, obj, end)| format!("{k} = {obj}{end}")),
        ]
    })
}

fn block(inner: BoxedStrategy<String>) -> impl Strategy<Value = String> {
    (
        prop::option::of(string()),
        "[ \n]{0,2}",
        prop::collection::vec(inner, 0..6),
    )
        .prop_map(|(name, leading, items)| match name {
            Some(name) => format!("{name}{leading}{{{}}}", items.concat()),
            None => format!("{{{}}}", items.concat()),
        })
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(item(), 0..12).prop_map(|items| items.concat())
}

fn collect_strings<'a, 'src>(content: &'a [Node<'src>], out: &mut Vec<&'a StringValue<'src>>) {
    for node in content {
        match node {
            Node::String(s) => out.push(s),
            Node::Object(o) => {
                out.extend(o.name());
                collect_strings(o.content(), out);
            }
            Node::KeyValue(kv) => {
                out.push(kv.key());
                match kv.value() {
                    Value::String(s) => out.push(s),
                    Value::Object(o) => {
                        out.extend(o.name());
                        collect_strings(o.content(), out);
                    }
                }
            }
            Node::WhiteSpace(_) | Node::Comment(_) | Node::Separator(_) => {}
        }
    }
}

proptest! {
    #[test]
    fn generated_documents_roundtrip(source in document()) {
        let doc = parse(&source).map_err(|e| TestCaseError::fail(format!("{e}")))?;
        prop_assert!(!doc.is_truncated());
        prop_assert_eq!(doc.to_string(), source);
    }

    #[test]
    fn arbitrary_input_roundtrips_when_accepted(source in "[a-z{}=;,#'\"\\\\ \t\r\n]{0,40}") {
        if let Ok(doc) = parse(&source) {
            prop_assert_eq!(format!("{}{}", doc, doc.unparsed()), source);
        }
    }

    #[test]
    fn decoding_never_panics(source in "\\PC{0,40}") {
        if let Ok(doc) = parse(&source) {
            let mut strings = Vec::new();
            collect_strings(doc.content(), &mut strings);
            for s in strings {
                let lenient = s.text();
                if let Ok(strict) = s.try_text() {
                    prop_assert_eq!(strict, lenient);
                }
            }
        }
    }

    #[test]
    fn unquoted_strings_decode_to_themselves(w in word()) {
        let doc = parse(&w).map_err(|e| TestCaseError::fail(format!("{e}")))?;
        let Some(Node::String(s)) = doc.content().first() else {
            return Err(TestCaseError::fail("expected a bare string"));
        };
        prop_assert_eq!(s.text(), w.as_str());
    }
}
