//! Regular expressions over multi-character letters
//!
//! The syntax is fully parenthesized:
//!
//! - a letter is any non-empty run of characters other than `( ) . + *`
//! - `(e.f)` is the concatenation of `e` and `f`
//! - `(e+f)` is the alternation of `e` and `f`
//! - `(e)*` is the Kleene star of `e`
//!
//! Whitespace is ignored. [Expression::to_nfa] translates an expression
//! bottom-up into an [Nfa] using the automaton constructions.
use std::{fmt, iter::Peekable, str::Chars, str::FromStr};

use crate::automaton::{self, AutomatonError, Letter, Nfa};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Expected {expected:?}, got {found:?}")]
    CharExpected { expected: char, found: Option<char> },
    #[error("Expected '.', '+' or ')', got {found:?}")]
    OperatorExpected { found: Option<char> },
    #[error("Letter expected, got {found:?}")]
    LetterExpected { found: Option<char> },
    #[error("Unexpected {found:?} after the expression")]
    TrailingInput { found: char },
}

/// An abstract syntax tree of a regular expression
#[derive(Debug, Clone)]
pub enum Expression {
    Letter(String),
    Concat(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Star(Box<Expression>),
}

impl Expression {
    pub fn letter(letter: &str) -> Self {
        Expression::Letter(letter.to_string())
    }

    pub fn concat(left: Expression, right: Expression) -> Self {
        Expression::Concat(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    pub fn star(inner: Expression) -> Self {
        Expression::Star(Box::new(inner))
    }

    /// Build the automaton recognizing the language of the expression
    pub fn to_nfa(&self) -> Result<Nfa, AutomatonError> {
        match self {
            Expression::Letter(l) => Ok(automaton::one_letter(Letter::new(l.as_str()))),
            Expression::Concat(left, right) => Ok(automaton::concat(&left.to_nfa()?, &right.to_nfa()?)),
            Expression::Or(left, right) => Ok(automaton::union(&left.to_nfa()?, &right.to_nfa()?)),
            Expression::Star(inner) => {
                let mut nfa = inner.to_nfa()?;
                automaton::kleene_star(&mut nfa)?;
                Ok(nfa)
            }
        }
    }
}

/// Structural equality where alternation is commutative
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expression::Letter(a), Expression::Letter(b)) => a == b,
            (Expression::Concat(l1, r1), Expression::Concat(l2, r2)) => l1 == l2 && r1 == r2,
            (Expression::Or(l1, r1), Expression::Or(l2, r2)) => {
                (l1 == l2 && r1 == r2) || (l1 == r2 && r1 == l2)
            }
            (Expression::Star(e1), Expression::Star(e2)) => e1 == e2,
            _ => false,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Letter(l) => write!(f, "{}", l),
            Expression::Concat(left, right) => write!(f, "({}.{})", left, right),
            Expression::Or(left, right) => write!(f, "({}+{})", left, right),
            Expression::Star(inner) => write!(f, "({})*", inner),
        }
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        ExpressionParser::new(&source).expression()
    }
}

fn is_special(c: char) -> bool {
    matches!(c, '(' | ')' | '.' | '+' | '*')
}

pub struct ExpressionParser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> ExpressionParser<'a> {
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

    fn letter(&mut self) -> Result<Expression, ParseError> {
        let mut letter = String::new();
        while let Some(c) = self.chars.next_if(|&c| !is_special(c)) {
            letter.push(c);
        }
        if letter.is_empty() {
            Err(ParseError::LetterExpected {
                found: self.chars.peek().copied(),
            })
        } else {
            Ok(Expression::Letter(letter))
        }
    }

    fn group(&mut self) -> Result<Expression, ParseError> {
        self.consume('(')?;
        let left = self.term()?;
        match self.chars.next() {
            Some('.') => {
                let right = self.term()?;
                self.consume(')')?;
                Ok(Expression::concat(left, right))
            }
            Some('+') => {
                let right = self.term()?;
                self.consume(')')?;
                Ok(Expression::or(left, right))
            }
            Some(')') => {
                self.consume('*')?;
                Ok(Expression::star(left))
            }
            found => Err(ParseError::OperatorExpected { found }),
        }
    }

    fn term(&mut self) -> Result<Expression, ParseError> {
        match self.chars.peek() {
            Some('(') => self.group(),
            _ => self.letter(),
        }
    }

    /// Parse a complete expression. The whole input must be consumed.
    pub fn expression(&mut self) -> Result<Expression, ParseError> {
        let expression = self.term()?;
        match self.chars.next() {
            None => Ok(expression),
            Some(found) => Err(ParseError::TrailingInput { found }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Expression, ParseError> {
        source.parse()
    }

    fn word(letters: &[&str]) -> Vec<Letter> {
        letters.iter().map(|l| Letter::new(*l)).collect()
    }

    #[test]
    fn letters() {
        assert_eq!(parse("π"), Ok(Expression::letter("π")));
        assert_eq!(parse("πasdf"), Ok(Expression::letter("πasdf")));
        assert_eq!(parse(" π asdf "), Ok(Expression::letter("πasdf")));
        assert_eq!(
            parse("π."),
            Err(ParseError::TrailingInput { found: '.' })
        );
        assert_eq!(
            parse("π*"),
            Err(ParseError::TrailingInput { found: '*' })
        );
        assert_eq!(parse(""), Err(ParseError::LetterExpected { found: None }));
    }

    #[test]
    fn concatenation() {
        assert_eq!(
            parse("(asdf.π)"),
            Ok(Expression::concat(
                Expression::letter("asdf"),
                Expression::letter("π")
            ))
        );
        assert_ne!(
            parse("(asdf.π)"),
            Ok(Expression::concat(
                Expression::letter("π"),
                Expression::letter("asdf")
            ))
        );
    }

    #[test]
    fn alternation() {
        let expected = Expression::or(Expression::letter("asdf"), Expression::letter("π"));
        assert_eq!(parse("(asdf+π)"), Ok(expected.clone()));
        // alternation is commutative
        assert_eq!(parse("(π+asdf)"), Ok(expected));
        assert_eq!(
            parse("((asdf+π)"),
            Err(ParseError::OperatorExpected { found: None })
        );
        assert_eq!(
            parse("(asdf)"),
            Err(ParseError::CharExpected {
                expected: '*',
                found: None
            })
        );
    }

    #[test]
    fn star() {
        assert_eq!(
            parse("((asdf+π))*"),
            Ok(Expression::star(Expression::or(
                Expression::letter("asdf"),
                Expression::letter("π")
            )))
        );
        assert!(parse("(π)").is_err());
        assert!(parse("()*").is_err());
    }

    #[test]
    fn nested() {
        let expected = Expression::concat(
            Expression::letter("a"),
            Expression::concat(
                Expression::or(Expression::letter("π"), Expression::letter("b")),
                Expression::star(Expression::letter("c")),
            ),
        );
        assert_eq!(parse("(a.((π+b).(c)*))"), Ok(expected.clone()));
        assert_eq!(expected.to_string(), "(a.((π+b).(c)*))");
        assert_eq!(parse(&expected.to_string()), Ok(expected));
    }

    #[test]
    fn malformed() {
        assert!(parse("(a.b").is_err());
        assert!(parse("(a.b))").is_err());
        assert!(parse("(a-b)").is_err());
        assert!(parse("(.b)").is_err());
        assert!(parse(")").is_err());
    }

    #[test]
    fn to_nfa() {
        let nfa = parse("(a.((π+b).(c)*))").unwrap().to_nfa().unwrap();
        assert!(nfa.accepts(&word(&["a", "π"])));
        assert!(nfa.accepts(&word(&["a", "b", "c", "c"])));
        assert!(!nfa.accepts(&word(&["a"])));
        assert!(!nfa.accepts(&word(&["a", "c"])));
        assert!(!nfa.accepts(&word(&["a", "π", "b"])));
    }

    #[test]
    fn to_nfa_with_multi_character_letters() {
        let nfa = parse("((ab+cd))*").unwrap().to_nfa().unwrap();
        assert_eq!(nfa.alphabet().len(), 2);
        assert!(nfa.accepts(&word(&[])));
        assert!(nfa.accepts(&word(&["ab", "cd", "ab"])));
        assert!(!nfa.accepts(&word(&["a", "b"])));
    }

    #[test]
    fn to_nfa_matches_constructions() {
        let nfa = parse("((a.a)+b)").unwrap().to_nfa().unwrap();
        let expected = automaton::union(
            &automaton::concat(
                &automaton::one_letter("a".into()),
                &automaton::one_letter("a".into()),
            ),
            &automaton::one_letter("b".into()),
        );
        assert_eq!(nfa, expected);
    }
}
