use crate::context::ContextStore;
use crate::errors::{MatchError, Result};
use crate::expression::{Atom, EqualityChain, Expression, Term};
use std::collections::HashMap;
use tracing::debug;

/// =========================
/// Resolution
/// =========================

/// Every context key named by one expression, resolved to a boolean once.
/// Keys missing from the store resolve to `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings<'e> {
    values: HashMap<&'e str, bool>,
}

impl<'e> Bindings<'e> {
    pub fn resolve(expr: &'e Expression, store: &ContextStore) -> Self {
        let values = expr
            .identifiers()
            .into_iter()
            .map(|key| (key, store.is_truthy(key).unwrap_or(false)))
            .collect();
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// =========================
/// Folding
/// =========================

/// `||` over `&&` over equality chains, short-circuiting at both outer levels.
pub fn fold(expr: &Expression, bindings: &Bindings) -> Result<bool> {
    for conjunction in &expr.disjuncts {
        let mut all = true;
        for chain in &conjunction.chains {
            if !fold_chain(chain, bindings)? {
                all = false;
                break;
            }
        }
        if all {
            return Ok(true);
        }
    }
    Ok(false)
}

fn fold_chain(chain: &EqualityChain, bindings: &Bindings) -> Result<bool> {
    let mut acc = eval_term(&chain.head, bindings)?;
    for (op, term) in &chain.rest {
        acc = op.apply(acc, eval_term(term, bindings)?);
    }
    Ok(acc)
}

fn eval_term(term: &Term, bindings: &Bindings) -> Result<bool> {
    let value = match &term.atom {
        Atom::Literal(b) => *b,
        Atom::Key(k) => bindings
            .get(k)
            .ok_or_else(|| MatchError::EvaluationFailed(format!("unresolved key `{k}`")))?,
    };
    Ok(value != term.negated)
}

/// =========================
/// Public API
/// =========================

/// Validate `input`, resolve its keys against `store`, and fold it.
pub fn evaluate(store: &ContextStore, input: &str) -> Result<bool> {
    let expr = Expression::parse(input)?;
    let bindings = Bindings::resolve(&expr, store);
    let out = fold(&expr, &bindings)?;
    debug!(expression = input, keys = bindings.len(), result = out, "context expression evaluated");
    Ok(out)
}
