use context_key_matcher as ckm;
use ckm::diagnostics::RecordingSink;
use ckm::{truthy, ContextKeyService};
use proptest::prelude::*;
use serde_json::Value;

fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z_$][A-Za-z0-9_$]{0,12}".prop_filter("literal", |s: &String| s != "true" && s != "false")
}

fn json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,4}".prop_map(Value::String),
    ]
}

fn op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["&&", "||", "==", "!=", "===", "!=="])
}

/// Reference semantics over booleans: || over && over left-assoc equality.
fn reference(terms: &[bool], ops: &[&str]) -> bool {
    let mut disj = false;
    let mut conj = true;
    let mut chain = terms[0];
    for (op, &t) in ops.iter().zip(&terms[1..]) {
        match *op {
            "==" | "===" => chain = chain == t,
            "!=" | "!==" => chain = chain != t,
            "&&" => {
                conj = conj && chain;
                chain = t;
            }
            _ => {
                disj = disj || (conj && chain);
                conj = true;
                chain = t;
            }
        }
    }
    disj || (conj && chain)
}

proptest! {
    #[test]
    fn set_then_get_round_trips(key in ident(), value in json_scalar()) {
        let mut svc = ContextKeyService::new();
        svc.set_context(key.clone(), value.clone());
        prop_assert_eq!(svc.store().get_value(&key), Some(&value));
        prop_assert_eq!(svc.matches(&key), truthy(&value));
    }

    #[test]
    fn unset_identifiers_are_false(key in ident()) {
        let svc = ContextKeyService::with_store(ckm::context::ContextStore::from_json("{}").unwrap());
        prop_assume!(key != "editorFocus");
        prop_assert!(!svc.matches(&key));
        let conj = format!("{key} && editorFocus");
        prop_assert!(!svc.matches(&conj));
    }

    #[test]
    fn folding_agrees_with_reference(
        values in prop::collection::vec((any::<bool>(), any::<bool>()), 1..8),
        ops in prop::collection::vec(op(), 7),
    ) {
        let mut svc = ContextKeyService::new();
        let mut src = String::new();
        let mut terms = Vec::new();
        for (i, (value, negated)) in values.iter().enumerate() {
            let key = format!("k{i}");
            svc.set_context(key.clone(), *value);
            if i > 0 {
                src.push_str(&format!(" {} ", ops[i - 1]));
            }
            if *negated {
                src.push('!');
            }
            src.push_str(&key);
            terms.push(*value != *negated);
        }
        let expected = reference(&terms, &ops[..terms.len() - 1]);
        prop_assert_eq!(svc.try_match(&src), Ok(expected));
        prop_assert_eq!(svc.matches(&src), svc.matches(&src));
    }

    #[test]
    fn anything_outside_the_alphabet_is_rejected(
        prefix in ident(),
        bad in prop::sample::select(vec!['(', ')', '.', ';', '"', '\'', '=', '+', '[', '{', '`', ',', '#']),
        suffix in "[a-z]{0,3}",
    ) {
        let sink = RecordingSink::new();
        let mut svc = ContextKeyService::new().with_sink(sink.clone());
        svc.set_context(prefix.clone(), true);
        let before = svc.store().clone();
        let src = format!("{prefix}{bad}{suffix}");
        prop_assert!(!svc.matches(&src));
        prop_assert_eq!(sink.diagnostics().len(), 1);
        prop_assert_eq!(svc.store(), &before);
    }

    #[test]
    fn arbitrary_input_never_panics(src in ".{0,40}") {
        let svc = ContextKeyService::new();
        let _ = svc.matches(&src);
    }
}
