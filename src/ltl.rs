//! Formulas of linear temporal logic
//!
//! Unary operators are written in front of a parenthesized operand,
//! `¬(φ)`, `○(φ)`, `□(φ)` and `◇(φ)`. Conjunction and disjunction are
//! enclosed in one pair of parentheses, `(φ∧ψ)` and `(φ∨ψ)`, while both
//! operands of until carry their own, `((φ)U(ψ))`. Everything else is an
//! atomic proposition, except for the reserved `true` and `false`.
use std::{fmt, iter::Peekable, ops, str::Chars, str::FromStr};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Expected {expected:?}, got {found:?}")]
    CharExpected { expected: char, found: Option<char> },
    #[error("Expected '∧', '∨' or ')', got {found:?}")]
    OperatorExpected { found: Option<char> },
    #[error("Atomic proposition expected, got {found:?}")]
    AtomExpected { found: Option<char> },
    #[error("Parenthesized formula outside of an until")]
    ExtraParentheses,
    #[error("Operand of an until without its own parentheses")]
    MissingParentheses,
    #[error("Unexpected {found:?} after the formula")]
    TrailingInput { found: char },
}

#[derive(Debug, Clone)]
pub enum Formula {
    True,
    False,
    Ap(String),
    Not(Box<Formula>),
    Next(Box<Formula>),
    Always(Box<Formula>),
    Eventually(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Until(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn ap(proposition: &str) -> Self {
        Formula::Ap(proposition.to_string())
    }

    pub fn next(phi: Formula) -> Self {
        Formula::Next(Box::new(phi))
    }

    pub fn always(phi: Formula) -> Self {
        Formula::Always(Box::new(phi))
    }

    pub fn eventually(phi: Formula) -> Self {
        Formula::Eventually(Box::new(phi))
    }

    pub fn and(phi: Formula, psi: Formula) -> Self {
        Formula::And(Box::new(phi), Box::new(psi))
    }

    pub fn or(phi: Formula, psi: Formula) -> Self {
        Formula::Or(Box::new(phi), Box::new(psi))
    }

    pub fn until(phi: Formula, psi: Formula) -> Self {
        Formula::Until(Box::new(phi), Box::new(psi))
    }
}

impl ops::Not for Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        Formula::Not(Box::new(self))
    }
}

/// Structural equality where conjunction and disjunction are commutative
impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        use Formula::*;
        match (self, other) {
            (True, True) | (False, False) => true,
            (Ap(a), Ap(b)) => a == b,
            (Not(a), Not(b))
            | (Next(a), Next(b))
            | (Always(a), Always(b))
            | (Eventually(a), Eventually(b)) => a == b,
            (And(p1, q1), And(p2, q2)) | (Or(p1, q1), Or(p2, q2)) => {
                (p1 == p2 && q1 == q2) || (p1 == q2 && q1 == p2)
            }
            (Until(p1, q1), Until(p2, q2)) => p1 == p2 && q1 == q2,
            _ => false,
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::True => write!(f, "true"),
            Formula::False => write!(f, "false"),
            Formula::Ap(a) => write!(f, "{}", a),
            Formula::Not(phi) => write!(f, "¬({})", phi),
            Formula::Next(phi) => write!(f, "○({})", phi),
            Formula::Always(phi) => write!(f, "□({})", phi),
            Formula::Eventually(phi) => write!(f, "◇({})", phi),
            Formula::And(phi, psi) => write!(f, "({}∧{})", phi, psi),
            Formula::Or(phi, psi) => write!(f, "({}∨{})", phi, psi),
            Formula::Until(phi, psi) => write!(f, "(({})U({}))", phi, psi),
        }
    }
}

impl FromStr for Formula {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        FormulaParser::new(&source).formula_complete()
    }
}

fn is_reserved(c: char) -> bool {
    matches!(c, '¬' | '(' | ')' | '∧' | '∨' | '□' | '◇' | '○')
}

/// What a pair of parentheses turned out to hold
enum Group {
    /// `(φ∧ψ)`, `(φ∨ψ)` or `((φ)U(ψ))`, a formula on its own
    Complete(Formula),
    /// `(φ)`, only valid as an operand of until
    Bare(Formula),
}

pub struct FormulaParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> FormulaParser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
        }
    }

    fn consume(&mut self, expected: char) -> Result<(), ParseError> {
        match self.chars.next() {
            Some(c) if c == expected => Ok(()),
            found => Err(ParseError::CharExpected { expected, found }),
        }
    }

    fn atom(&mut self) -> Result<Formula, ParseError> {
        let mut atom = String::new();
        while let Some(c) = self.chars.next_if(|&c| !is_reserved(c)) {
            atom.push(c);
        }
        match atom.as_str() {
            "" => Err(ParseError::AtomExpected {
                found: self.chars.peek().copied(),
            }),
            "true" => Ok(Formula::True),
            "false" => Ok(Formula::False),
            _ => Ok(Formula::Ap(atom)),
        }
    }

    fn unary(&mut self, operator: char) -> Result<Formula, ParseError> {
        self.consume(operator)?;
        self.consume('(')?;
        let phi = self.formula()?;
        self.consume(')')?;
        Ok(match operator {
            '¬' => !phi,
            '○' => Formula::next(phi),
            '□' => Formula::always(phi),
            _ => Formula::eventually(phi),
        })
    }

    fn group(&mut self) -> Result<Group, ParseError> {
        self.consume('(')?;
        let inner = match self.chars.peek() {
            Some('(') => self.group()?,
            _ => Group::Complete(self.formula()?),
        };
        match (inner, self.chars.next()) {
            (Group::Complete(phi), Some(')')) => Ok(Group::Bare(phi)),
            (Group::Complete(phi), Some(operator @ ('∧' | '∨'))) => {
                let psi = self.formula()?;
                self.consume(')')?;
                Ok(Group::Complete(if operator == '∧' {
                    Formula::and(phi, psi)
                } else {
                    Formula::or(phi, psi)
                }))
            }
            (Group::Complete(_), found) => Err(ParseError::OperatorExpected { found }),
            (Group::Bare(phi), Some('U')) => {
                let Group::Bare(psi) = self.group()? else {
                    return Err(ParseError::MissingParentheses);
                };
                self.consume(')')?;
                Ok(Group::Complete(Formula::until(phi, psi)))
            }
            (Group::Bare(_), found) => Err(ParseError::CharExpected {
                expected: 'U',
                found,
            }),
        }
    }

    fn formula(&mut self) -> Result<Formula, ParseError> {
        match self.chars.peek().copied() {
            Some('(') => match self.group()? {
                Group::Complete(phi) => Ok(phi),
                Group::Bare(_) => Err(ParseError::ExtraParentheses),
            },
            Some(operator @ ('¬' | '○' | '□' | '◇')) => self.unary(operator),
            _ => self.atom(),
        }
    }

    /// Parse a formula spanning the whole input
    pub fn formula_complete(&mut self) -> Result<Formula, ParseError> {
        let phi = self.formula()?;
        match self.chars.next() {
            None => Ok(phi),
            Some(found) => Err(ParseError::TrailingInput { found }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Formula, ParseError> {
        source.parse()
    }

    fn normalized(source: &str) -> String {
        parse(source).unwrap().to_string()
    }

    #[test]
    fn negation_and_disjunction() {
        assert_eq!(
            normalized("(¬((π∧¬ (prΘp))    )∨a)"),
            "(¬((π∧¬(prΘp)))∨a)"
        );
        assert_eq!(
            parse("(¬((π∧¬ (prΘp))    )∨a)"),
            Ok(Formula::or(
                !Formula::and(Formula::ap("π"), !Formula::ap("prΘp")),
                Formula::ap("a")
            ))
        );
        assert_eq!(parse("¬x(a)"), Err(ParseError::CharExpected { expected: '(', found: Some('x') }));
    }

    #[test]
    fn atomic_propositions() {
        assert_eq!(parse("xx"), Ok(Formula::ap("xx")));
        assert_eq!(normalized("xx"), "xx");
        assert_eq!(parse("x¬x"), Err(ParseError::TrailingInput { found: '¬' }));
        assert_eq!(parse(""), Err(ParseError::AtomExpected { found: None }));
    }

    #[test]
    fn brackets() {
        assert!(parse("(a∧(b)))").is_err());
        assert!(parse("((b))∨a)").is_err());
        assert!(parse("((b∧a)").is_err());
        assert_eq!(parse("(a)"), Err(ParseError::ExtraParentheses));
        assert_eq!(parse("(a∧b))"), Err(ParseError::TrailingInput { found: ')' }));
        assert_eq!(parse("((a∧b)∨c)"), Ok(Formula::or(Formula::and(Formula::ap("a"), Formula::ap("b")), Formula::ap("c"))));
    }

    #[test]
    fn constants() {
        assert_eq!(normalized("(¬(¬(false))∨false)"), "(¬(¬(false))∨false)");
        assert_eq!(
            parse("(¬(¬(false))∨false)"),
            Ok(Formula::or(!!Formula::False, Formula::False))
        );
        assert_eq!(normalized("(¬(¬(true))∨true)"), "(¬(¬(true))∨true)");
        // only the exact words are reserved
        assert_eq!(
            normalized("(¬((falsefalse∧¬ (false))    )∨false)"),
            "(¬((falsefalse∧¬(false)))∨false)"
        );
        assert_eq!(
            normalized("(¬((truetrue∧¬ (true))    )∨true)"),
            "(¬((truetrue∧¬(true)))∨true)"
        );
        assert_eq!(parse("truetrue"), Ok(Formula::ap("truetrue")));
    }

    #[test]
    fn temporal_operators() {
        assert_eq!(parse("○(false)"), Ok(Formula::next(Formula::False)));
        assert_eq!(normalized("○(false)"), "○(false)");
        assert!(parse("○false").is_err());
        assert_eq!(parse("◇(false)"), Ok(Formula::eventually(Formula::False)));
        assert_eq!(normalized("◇(false)"), "◇(false)");
        assert!(parse("◇false").is_err());
        assert_eq!(normalized("□(◇(a))"), "□(◇(a))");
        assert!(parse("□(a").is_err());
    }

    #[test]
    fn until() {
        let phi = parse("((a)U(((b)U(false))))").unwrap();
        assert_eq!(
            phi,
            Formula::until(
                Formula::ap("a"),
                Formula::until(Formula::ap("b"), Formula::False)
            )
        );
        assert_eq!(phi.to_string(), "((a)U(((b)U(false))))");
        assert_eq!(
            normalized("¬((((a∨b))U(c)))"),
            "¬((((a∨b))U(c)))"
        );
        assert!(parse("((a)V(b))").is_err());
        assert!(parse("((a)U(b)").is_err());
        assert!(parse("((a)Ub)").is_err());
        assert_eq!(parse("((a)U(b∧c))"), Err(ParseError::MissingParentheses));
    }

    #[test]
    fn commutative_equality() {
        let a = Formula::ap("a");
        let b = Formula::ap("b");
        assert_eq!(Formula::and(a.clone(), b.clone()), Formula::and(b.clone(), a.clone()));
        assert_eq!(Formula::or(a.clone(), b.clone()), Formula::or(b.clone(), a.clone()));
        assert_ne!(Formula::and(a.clone(), b.clone()), Formula::or(a.clone(), b.clone()));
        assert_ne!(Formula::until(a.clone(), b.clone()), Formula::until(b, a));
    }
}
