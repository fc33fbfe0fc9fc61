// src/expression.rs
use crate::errors::{MatchError, Result};
use crate::parser::{is_ws, Parser};
use itertools::Itertools;

/// Operand of a term: a boolean literal or a context key to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Literal(bool),
    Key(String),
}

/// `!`? atom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub negated: bool,
    pub atom: Atom,
}

/// Equality operators. On booleans the strict and loose forms agree; both are
/// kept so a parsed expression still says what was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqOp {
    Eq,
    Ne,
    StrictEq,
    StrictNe,
}

impl EqOp {
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            EqOp::Eq | EqOp::StrictEq => a == b,
            EqOp::Ne | EqOp::StrictNe => a != b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Equality(EqOp),
    And,
    Or,
}

/// `t0 op t1 op t2 ...`, folded left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityChain {
    pub(crate) head: Term,
    pub(crate) rest: Vec<(EqOp, Term)>,
}

/// Chains joined by `&&`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conjunction {
    pub(crate) chains: Vec<EqualityChain>,
}

/// A validated context expression.
///
/// Without parentheses the grammar can only produce `||` over `&&` over
/// equality chains, so the tree is stored as three flat levels. Folding it
/// needs no recursion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub(crate) disjuncts: Vec<Conjunction>,
}

impl Expression {
    /// Validate and parse. The whole trimmed input must match
    ///
    /// ```text
    /// expr  := term (ws? binop ws? term)*
    /// term  := "!"? IDENT
    /// binop := "&&" | "||" | "==" | "!=" | "===" | "!=="
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        parse_expr(input)
    }

    /// Distinct context keys read by the expression, in order of first use.
    /// Literals are not keys.
    pub fn identifiers(&self) -> Vec<&str> {
        self.terms()
            .filter_map(|t| match &t.atom {
                Atom::Key(k) => Some(k.as_str()),
                Atom::Literal(_) => None,
            })
            .unique()
            .collect()
    }

    pub(crate) fn terms(&self) -> impl Iterator<Item = &Term> {
        self.disjuncts
            .iter()
            .flat_map(|c| c.chains.iter())
            .flat_map(|ch| std::iter::once(&ch.head).chain(ch.rest.iter().map(|(_, t)| t)))
    }
}

pub fn parse_expr(input: &str) -> Result<Expression> {
    let trimmed = input.trim_matches(is_ws);
    if trimmed.is_empty() {
        return Err(MatchError::rejected("empty expression"));
    }
    let mut p = Parser::new(trimmed);

    let first = parse_term(&mut p)?;
    let mut rest = Vec::new();
    loop {
        p.skip_ws();
        if p.eof() {
            break;
        }
        let op = parse_binop(&mut p)?;
        p.skip_ws();
        let term = parse_term(&mut p)?;
        rest.push((op, term));
    }

    Ok(assemble(first, rest))
}

fn parse_term(p: &mut Parser) -> Result<Term> {
    let negated = p.consume_char('!');
    let ident = p.parse_identifier()?;
    let atom = match ident {
        "true" => Atom::Literal(true),
        "false" => Atom::Literal(false),
        key => Atom::Key(key.to_string()),
    };
    Ok(Term { negated, atom })
}

fn parse_binop(p: &mut Parser) -> Result<BinOp> {
    // longest first, so `===` is never read as `==` followed by `=`
    const OPS: [(&str, BinOp); 6] = [
        ("===", BinOp::Equality(EqOp::StrictEq)),
        ("!==", BinOp::Equality(EqOp::StrictNe)),
        ("==", BinOp::Equality(EqOp::Eq)),
        ("!=", BinOp::Equality(EqOp::Ne)),
        ("&&", BinOp::And),
        ("||", BinOp::Or),
    ];
    for (lit, op) in OPS {
        if p.consume_str(lit) {
            return Ok(op);
        }
    }
    let found = p
        .peek_char()
        .map(|c| format!("'{c}'"))
        .unwrap_or_else(|| "end of input".into());
    Err(MatchError::rejected(format!(
        "operator expected at offset {}, found {found}",
        p.offset()
    )))
}

fn assemble(first: Term, rest: Vec<(BinOp, Term)>) -> Expression {
    let mut disjuncts = Vec::new();
    let mut chains = Vec::new();
    let mut chain = EqualityChain { head: first, rest: Vec::new() };

    for (op, term) in rest {
        match op {
            BinOp::Equality(eq) => chain.rest.push((eq, term)),
            BinOp::And => {
                let done = std::mem::replace(&mut chain, EqualityChain { head: term, rest: Vec::new() });
                chains.push(done);
            }
            BinOp::Or => {
                let done = std::mem::replace(&mut chain, EqualityChain { head: term, rest: Vec::new() });
                chains.push(done);
                disjuncts.push(Conjunction { chains: std::mem::take(&mut chains) });
            }
        }
    }
    chains.push(chain);
    disjuncts.push(Conjunction { chains });

    Expression { disjuncts }
}
