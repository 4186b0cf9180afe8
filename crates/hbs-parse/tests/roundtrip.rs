//! Property tests: any input parses without error and renders back to itself.

use hbs_parse::{BlockKind, DiagnosticKind, Node, parse};
use proptest::prelude::*;

/// Literal text between tags.
fn text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 <>/\n.-]{0,12}").unwrap()
}

/// A tag name or path. Never `else` or `elseif`, which are generated
/// explicitly.
fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z][a-z0-9_]{0,6}")
            .unwrap()
            .prop_filter("branch keyword", |n| n != "else" && n != "elseif"),
        Just("if".to_string()),
        Just("each".to_string()),
        Just("../up".to_string()),
        Just("this.x".to_string()),
    ]
}

/// A single argument.
fn argument() -> impl Strategy<Value = String> {
    prop_oneof![
        name(),
        (name(), name()).prop_map(|(k, v)| format!("{}={}", k, v)),
        prop::string::string_regex("[0-9]{1,3}").unwrap(),
        prop::string::string_regex(r#""[a-z ]{0,6}""#).unwrap(),
        (name(), name()).prop_map(|(f, a)| format!("({} {})", f, a)),
        Just("as |item i|".to_string()),
    ]
}

fn arguments() -> impl Strategy<Value = String> {
    prop::collection::vec(argument(), 0..4).prop_map(|args| {
        args.iter()
            .map(|a| format!(" {}", a))
            .collect::<String>()
    })
}

/// `~` or nothing.
fn tilde() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just("~")]
}

/// One piece of a template. Pieces are not necessarily balanced.
fn piece() -> impl Strategy<Value = String> {
    prop_oneof![
        text(),
        (tilde(), name(), arguments(), tilde())
            .prop_map(|(l, n, a, r)| format!("{{{{{}#{}{}{}}}}}", l, n, a, r)),
        (tilde(), name(), tilde()).prop_map(|(l, n, r)| format!("{{{{{}/{}{}}}}}", l, n, r)),
        (tilde(), name(), arguments(), tilde())
            .prop_map(|(l, n, a, r)| format!("{{{{{}{}{}{}}}}}", l, n, a, r)),
        name().prop_map(|n| format!("{{{{{{{}}}}}}}", n)),
        text().prop_map(|t| format!("{{{{!{}}}}}", t)),
        text().prop_map(|t| format!("{{{{!--{}--}}}}", t)),
        Just("{{else}}".to_string()),
        Just("{{elseif x}}".to_string()),
        Just("{{#elseif x}}".to_string()),
        Just("{{".to_string()),
        Just("}}".to_string()),
        Just("{{{".to_string()),
        Just("~".to_string()),
    ]
}

fn template() -> impl Strategy<Value = String> {
    prop::collection::vec(piece(), 0..16).prop_map(|pieces| pieces.concat())
}

/// Well formed: every block is closed by its own name.
fn balanced(depth: u32) -> BoxedStrategy<String> {
    let leaf = prop_oneof![
        text(),
        (name(), arguments()).prop_map(|(n, a)| format!("{{{{{}{}}}}}", n, a)),
        text().prop_map(|t| format!("{{{{! {}}}}}", t)),
        text().prop_map(|t| format!("{{{{!--{}--}}}}", t)),
    ];
    if depth == 0 {
        return leaf.boxed();
    }
    prop_oneof![
        leaf,
        (name(), arguments(), prop::collection::vec(balanced(depth - 1), 0..4)).prop_map(
            |(n, a, body)| format!("{{{{#{}{}}}}}{}{{{{/{}}}}}", n, a, body.concat(), n)
        ),
    ]
    .boxed()
}

proptest! {
    #[test]
    fn template_pieces_round_trip(source in template()) {
        let parse = parse(&source).unwrap();
        prop_assert_eq!(parse.root.render(), source);
    }

    #[test]
    fn arbitrary_input_round_trips(source in "\\PC*") {
        let parse = parse(&source).unwrap();
        prop_assert_eq!(parse.root.render(), source);
    }

    #[test]
    fn tag_syntax_soup_round_trips(source in "[{}#/!~=|()\\[\\] a\"'-]{0,40}") {
        let parse = parse(&source).unwrap();
        prop_assert_eq!(parse.root.render(), source);
    }

    #[test]
    fn balanced_templates_parse_cleanly(
        body in prop::collection::vec(balanced(3), 0..6).prop_map(|b| b.concat())
    ) {
        let parse = parse(&body).unwrap();
        prop_assert!(
            parse.is_ok(),
            "diagnostics for {:?}: {:?}",
            body,
            parse.diagnostics
        );
        prop_assert_eq!(parse.root.render(), body.clone());

        for node in parse.root.descendants() {
            if let Node::Block(block) = node
                && block.kind == BlockKind::Tag
            {
                prop_assert_eq!(block.tag_elements().count(), 2);
            }
        }
    }

    #[test]
    fn diagnostics_lie_within_source(source in template()) {
        let parse = parse(&source).unwrap();
        for diagnostic in &parse.diagnostics {
            prop_assert!(diagnostic.location.end as usize <= source.len());
            if let DiagnosticKind::UnbalancedTag { expected, actual, .. } = &diagnostic.kind {
                prop_assert_ne!(expected, actual);
            }
        }
    }
}
