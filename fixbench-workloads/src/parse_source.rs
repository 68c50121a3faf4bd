//! Source-Parsing Workload
//!
//! A small recursive-descent parser for arithmetic expressions, producing a
//! comparable syntax tree. The "empty rules" unit variant declares no-op
//! rules from both field-backed and accessor-backed sources, exercising the
//! general composition path the way a rule-bearing test class would.

use crate::{Reps, expect_eq};
use fixbench_compose::{
    BenchmarkUnit, ClassRule, FixtureManifest, InstanceRule, Outcome, RuleSource, TestDescriptor,
};
use thiserror::Error;

/// Fixed workload input.
pub const INPUT: &str = "(1 + 2) * 3 - 4 / 2";

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// An integer literal.
    Number(i64),
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

impl Expr {
    fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

/// Parse failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A character no grammar rule accepts.
    #[error("unexpected character {0:?} at offset {1}")]
    UnexpectedChar(char, usize),

    /// Input ended where an operand was required.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// An opening parenthesis was never closed.
    #[error("expected closing parenthesis at offset {0}")]
    UnclosedParen(usize),

    /// Input continued past a complete expression.
    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
}

/// Parse `source` into an expression tree.
///
/// Grammar, with the usual precedence (`*`/`/` bind tighter than `+`/`-`,
/// all operators left-associative):
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := factor (('*' | '/') factor)*
/// factor     := number | '(' expression ')'
/// ```
pub fn run_workload(source: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser {
        source: source.as_bytes(),
        pos: 0,
    };
    let expr = parser.expression()?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(ParseError::TrailingInput(parser.pos));
    }
    Ok(expr)
}

/// The tree `run_workload(INPUT)` produces.
pub fn expected_output() -> Expr {
    Expr::binary(
        BinOp::Sub,
        Expr::binary(
            BinOp::Mul,
            Expr::binary(BinOp::Add, Expr::Number(1), Expr::Number(2)),
            Expr::Number(3),
        ),
        Expr::binary(BinOp::Div, Expr::Number(4), Expr::Number(2)),
    )
}

struct Parser<'a> {
    source: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.term()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some(b'+') => BinOp::Add,
                Some(b'-') => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.factor()?;
        loop {
            self.skip_whitespace();
            let op = match self.peek() {
                Some(b'*') => BinOp::Mul,
                Some(b'/') => BinOp::Div,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd),
            Some(b'(') => {
                self.pos += 1;
                let expr = self.expression()?;
                self.skip_whitespace();
                if self.peek() == Some(b')') {
                    self.pos += 1;
                    Ok(expr)
                } else {
                    Err(ParseError::UnclosedParen(self.pos))
                }
            }
            Some(c) if c.is_ascii_digit() => {
                let mut value: i64 = 0;
                while let Some(c) = self.peek().filter(u8::is_ascii_digit) {
                    value = value * 10 + i64::from(c - b'0');
                    self.pos += 1;
                }
                Ok(Expr::Number(value))
            }
            Some(c) => Err(ParseError::UnexpectedChar(c as char, self.pos)),
        }
    }
}

/// Benchmark case: parses the fixed input and compares trees.
pub struct ParseSourceCase {
    input: &'static str,
    expected: Expr,
}

impl Default for ParseSourceCase {
    fn default() -> Self {
        ParseSourceCase {
            input: INPUT,
            expected: expected_output(),
        }
    }
}

impl ParseSourceCase {
    /// Run the workload `reps` times, checking every result.
    pub fn run(&mut self, reps: Reps) -> Outcome {
        for _ in 0..reps.count() {
            let result = run_workload(self.input)?;
            expect_eq(&self.expected, &result)?;
        }
        Ok(())
    }
}

/// Composed unit for this workload with no fixtures declared.
pub fn unit_for(reps: Reps) -> BenchmarkUnit<ParseSourceCase> {
    BenchmarkUnit::new(
        TestDescriptor::of::<ParseSourceCase>(reps.method()),
        FixtureManifest::empty(),
        ParseSourceCase::default,
        move |case| case.run(reps),
    )
}

/// Composed unit declaring no-op class and instance rules, each once from a
/// stored value and once from an accessor. Behavior matches `unit_for`; the
/// variant exists to keep the rule-bearing composition path measured.
pub fn empty_rules_unit_for(reps: Reps) -> BenchmarkUnit<ParseSourceCase> {
    let manifest = FixtureManifest::builder()
        .class_rule(RuleSource::Stored(ClassRule::noop()))
        .class_rule(RuleSource::accessor(ClassRule::noop))
        .instance_rule(RuleSource::Stored(InstanceRule::noop()))
        .instance_rule(RuleSource::accessor(InstanceRule::noop))
        .build();

    BenchmarkUnit::new(
        TestDescriptor::of::<ParseSourceCase>(reps.method()),
        manifest,
        ParseSourceCase::default,
        move |case| case.run(reps),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_workload_once() {
        assert_eq!(run_workload(INPUT).unwrap(), expected_output());
    }

    #[test]
    fn test_run_workload_thrice() {
        let expected = expected_output();
        for _ in 0..3 {
            assert_eq!(run_workload(INPUT).unwrap(), expected);
        }
    }

    #[test]
    fn test_precedence_and_associativity() {
        // 1 - 2 - 3 parses as (1 - 2) - 3
        let expr = run_workload("1 - 2 - 3").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinOp::Sub,
                Expr::binary(BinOp::Sub, Expr::Number(1), Expr::Number(2)),
                Expr::Number(3),
            )
        );

        // 1 + 2 * 3 keeps the product inner
        let expr = run_workload("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinOp::Add,
                Expr::Number(1),
                Expr::binary(BinOp::Mul, Expr::Number(2), Expr::Number(3)),
            )
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(run_workload(""), Err(ParseError::UnexpectedEnd));
        assert_eq!(run_workload("(1 + 2"), Err(ParseError::UnclosedParen(6)));
        assert_eq!(run_workload("1 + 2)"), Err(ParseError::TrailingInput(5)));
        assert_eq!(
            run_workload("1 + x"),
            Err(ParseError::UnexpectedChar('x', 4))
        );
    }

    #[test]
    fn test_empty_rules_unit_matches_plain_unit() {
        let plain = unit_for(Reps::Once);
        let with_rules = empty_rules_unit_for(Reps::Once);
        assert!(plain.invoke().is_ok());
        assert!(with_rules.invoke().is_ok());
    }
}
