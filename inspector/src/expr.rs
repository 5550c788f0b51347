//! Recursive-descent evaluator for the small expression language used by
//! info boxes.
//!
//! ```text
//! ExpressionList := Expression (',' Expression)*
//! Expression     := Term (('+' | '-') Term)*
//! Term           := Factor (('*' | '/') Factor)*
//! Factor         := Number | 'string' | Name | Name? '(' ExpressionList? ')'
//!                 | ('+' | '-') Factor
//! ```
//!
//! Bare names resolve through [`Scope::variable`], names followed by a
//! parenthesized argument list through [`Scope::call`]. A call without
//! arguments receives an empty [`Value::List`]. `+` concatenates when either
//! operand is a string; every other arithmetic operator needs two numeric
//! operands. Division follows IEEE semantics, so `1 / 0` is `inf`.

use crate::value::Value;

// ---------------------------------------------------------------------------
// Errors and options
// ---------------------------------------------------------------------------

/// Failure while tokenizing or evaluating an expression.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unterminated string starting at {0}")]
    UnterminatedString(usize),
    #[error("expected ')' but found {0}")]
    UnbalancedParen(String),
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("operator '{op}' needs numeric operands, got {left} and {right}")]
    NonNumeric {
        op: char,
        left: &'static str,
        right: &'static str,
    },
    #[error("cannot resolve '{name}': {reason}")]
    Variable { name: String, reason: String },
    #[error("call to '{name}' failed: {reason}")]
    Call { name: String, reason: String },
}

/// Tokenizer switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Accept `.` inside names so `stats.health` is a single variable.
    pub dotted_names: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self { dotted_names: true }
    }
}

/// Resolves names referenced by an expression.
pub trait Scope {
    fn variable(&mut self, name: &str) -> Result<Value, String>;
    fn call(&mut self, name: &str, args: Value) -> Result<Value, String>;
}

/// [`Scope`] backed by two closures.
pub struct FnScope<V, F> {
    pub variables: V,
    pub functions: F,
}

impl<V, F> Scope for FnScope<V, F>
where
    V: FnMut(&str) -> Result<Value, String>,
    F: FnMut(&str, Value) -> Result<Value, String>,
{
    fn variable(&mut self, name: &str) -> Result<Value, String> {
        (self.variables)(name)
    }

    fn call(&mut self, name: &str, args: Value) -> Result<Value, String> {
        (self.functions)(name, args)
    }
}

/// Scope that resolves nothing; only literals evaluate.
pub struct EmptyScope;

impl Scope for EmptyScope {
    fn variable(&mut self, name: &str) -> Result<Value, String> {
        Err(format!("unknown variable '{name}'"))
    }

    fn call(&mut self, name: &str, _args: Value) -> Result<Value, String> {
        Err(format!("unknown function '{name}'"))
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Evaluates `expression` with default options.
pub fn evaluate(expression: &str, scope: &mut dyn Scope) -> Result<Value, EvalError> {
    evaluate_with(expression, scope, EvalOptions::default())
}

/// Evaluates `expression`, resolving names through `scope`.
///
/// Each variable is looked up at most once per call and each function at most
/// once per distinct argument value.
pub fn evaluate_with(
    expression: &str,
    scope: &mut dyn Scope,
    options: EvalOptions,
) -> Result<Value, EvalError> {
    let tokens = tokenize(expression, options)?;
    if tokens.is_empty() {
        return Ok(Value::Null);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        scope,
        variables: Vec::new(),
        calls: Vec::new(),
    };
    let result = parser.expression_list()?;
    match parser.peek() {
        None => Ok(result),
        Some(token) => Err(EvalError::UnexpectedToken(token.describe())),
    }
}

/// Evaluates `expression` and returns display text plus a success flag.
/// On failure the text is the error message.
pub fn evaluate_text(expression: &str, scope: &mut dyn Scope, options: EvalOptions) -> (String, bool) {
    match evaluate_with(expression, scope, options) {
        Ok(value) => (value.to_string(), true),
        Err(err) => (format!("ERROR: {err}"), false),
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Str(String),
    Name(String),
    Op(char),
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Str(s) => format!("string '{s}'"),
            Token::Name(n) => format!("name '{n}'"),
            Token::Op(c) => format!("'{c}'"),
            Token::Comma => "','".to_string(),
        }
    }

    /// Whether a `+`/`-` after this token is a binary operator.
    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Str(_) | Token::Name(_) | Token::Op(')')
        )
    }
}

fn tokenize(expression: &str, options: EvalOptions) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        if ch == '\'' {
            let start = i + 1;
            let mut end = start;
            while end < chars.len() && chars[end] != '\'' {
                end += 1;
            }
            if end >= chars.len() {
                return Err(EvalError::UnterminatedString(i));
            }
            tokens.push(Token::Str(chars[start..end].iter().collect()));
            i = end + 1;
            continue;
        }

        let next_is_digit = chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
        let signed = (ch == '+' || ch == '-')
            && next_is_digit
            && !tokens.last().is_some_and(Token::ends_operand);
        if ch.is_ascii_digit() || signed {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let number = text
                .parse::<f64>()
                .map_err(|_| EvalError::InvalidNumber(text.clone()))?;
            tokens.push(Token::Number(number));
            continue;
        }

        if ch == '_' || ch.is_alphabetic() {
            let start = i;
            while i < chars.len()
                && (chars[i] == '_'
                    || chars[i].is_alphanumeric()
                    || (options.dotted_names && chars[i] == '.'))
            {
                i += 1;
            }
            tokens.push(Token::Name(chars[start..i].iter().collect()));
            continue;
        }

        match ch {
            '+' | '-' | '*' | '/' | '(' | ')' => tokens.push(Token::Op(ch)),
            ',' => tokens.push(Token::Comma),
            _ => return Err(EvalError::UnexpectedChar { ch, pos: i }),
        }
        i += 1;
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'s> {
    tokens: Vec<Token>,
    pos: usize,
    scope: &'s mut dyn Scope,
    variables: Vec<(String, Value)>,
    calls: Vec<(String, Value, Value)>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_op(&self) -> Option<char> {
        match self.peek() {
            Some(Token::Op(c)) => Some(*c),
            _ => None,
        }
    }

    fn expression_list(&mut self) -> Result<Value, EvalError> {
        let first = self.expression()?;
        if self.peek() != Some(&Token::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.peek() == Some(&Token::Comma) {
            self.pos += 1;
            items.push(self.expression()?);
        }
        Ok(Value::List(items))
    }

    fn expression(&mut self) -> Result<Value, EvalError> {
        let mut result = self.term()?;
        while let Some(op @ ('+' | '-')) = self.peek_op() {
            self.pos += 1;
            let right = self.term()?;
            result = if op == '+' && (result.is_string() || right.is_string()) {
                Value::Str(format!("{result}{right}"))
            } else {
                arithmetic(op, &result, &right)?
            };
        }
        Ok(result)
    }

    fn term(&mut self) -> Result<Value, EvalError> {
        let mut result = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.peek_op() {
            self.pos += 1;
            let right = self.factor()?;
            result = arithmetic(op, &result, &right)?;
        }
        Ok(result)
    }

    fn factor(&mut self) -> Result<Value, EvalError> {
        let Some(token) = self.peek().cloned() else {
            return Err(EvalError::UnexpectedEnd);
        };
        self.pos += 1;

        match token {
            Token::Number(n) => Ok(Value::Float(n)),
            Token::Str(s) => Ok(Value::Str(s)),
            Token::Op(sign @ ('+' | '-')) => {
                let operand = self.factor()?;
                let factor = Value::Float(if sign == '-' { -1.0 } else { 1.0 });
                arithmetic('*', &factor, &operand)
            }
            Token::Op('(') => {
                let inner = self.expression_list()?;
                self.expect_close()?;
                Ok(inner)
            }
            Token::Name(name) => {
                if self.peek_op() == Some('(') {
                    self.pos += 1;
                    let args = if self.peek_op() == Some(')') {
                        Value::List(Vec::new())
                    } else {
                        self.expression_list()?
                    };
                    self.expect_close()?;
                    self.call(name, args)
                } else {
                    self.variable(name)
                }
            }
            other => Err(EvalError::UnexpectedToken(other.describe())),
        }
    }

    fn expect_close(&mut self) -> Result<(), EvalError> {
        match self.peek() {
            Some(Token::Op(')')) => {
                self.pos += 1;
                Ok(())
            }
            Some(other) => Err(EvalError::UnbalancedParen(other.describe())),
            None => Err(EvalError::UnbalancedParen("end of expression".to_string())),
        }
    }

    fn variable(&mut self, name: String) -> Result<Value, EvalError> {
        if let Some((_, value)) = self.variables.iter().find(|(n, _)| *n == name) {
            return Ok(value.clone());
        }
        let value = self
            .scope
            .variable(&name)
            .map_err(|reason| EvalError::Variable {
                name: name.clone(),
                reason,
            })?;
        self.variables.push((name, value.clone()));
        Ok(value)
    }

    fn call(&mut self, name: String, args: Value) -> Result<Value, EvalError> {
        if let Some((_, _, value)) = self
            .calls
            .iter()
            .find(|(n, a, _)| *n == name && *a == args)
        {
            return Ok(value.clone());
        }
        let value = self
            .scope
            .call(&name, args.clone())
            .map_err(|reason| EvalError::Call {
                name: name.clone(),
                reason,
            })?;
        self.calls.push((name, args, value.clone()));
        Ok(value)
    }
}

fn arithmetic(op: char, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) else {
        return Err(EvalError::NonNumeric {
            op,
            left: left.type_label(),
            right: right.type_label(),
        });
    };
    let result = match op {
        '+' => l + r,
        '-' => l - r,
        '*' => l * r,
        _ => l / r,
    };
    Ok(Value::Float(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectorConfig;

    fn eval(text: &str) -> Result<Value, EvalError> {
        evaluate(text, &mut EmptyScope)
    }

    // --- Arithmetic ---

    #[test]
    fn adds_numbers() {
        assert_eq!(eval("3 + 4"), Ok(Value::Float(7.0)));
    }

    #[test]
    fn respects_precedence_and_parentheses() {
        assert_eq!(eval("2 * (3 + 4)"), Ok(Value::Float(14.0)));
        assert_eq!(eval("2 * 3 + 4"), Ok(Value::Float(10.0)));
        assert_eq!(eval("10 - 4 - 3"), Ok(Value::Float(3.0)));
    }

    #[test]
    fn division_by_zero_is_infinite() {
        assert_eq!(eval("1 / 0"), Ok(Value::Float(f64::INFINITY)));
    }

    #[test]
    fn signed_literals_only_where_unambiguous() {
        assert_eq!(eval("-4.5 + 3.5"), Ok(Value::Float(-1.0)));
        assert_eq!(eval("5 -2"), Ok(Value::Float(3.0)));
        assert_eq!(eval("(3.5 + -4.5) / 2"), Ok(Value::Float(-0.5)));
    }

    #[test]
    fn unary_minus_before_parenthesis() {
        assert_eq!(eval("-(1 + 2)"), Ok(Value::Float(-3.0)));
    }

    // --- Strings ---

    #[test]
    fn concatenates_strings() {
        assert_eq!(
            eval("'Hello ' + 'World'"),
            Ok(Value::Str("Hello World".into()))
        );
        assert_eq!(eval("'n = ' + 2 * 3"), Ok(Value::Str("n = 6".into())));
    }

    #[test]
    fn subtracting_strings_fails() {
        let err = eval("'a' - 1").unwrap_err();
        assert!(matches!(err, EvalError::NonNumeric { op: '-', .. }));
    }

    // --- Lists and calls ---

    #[test]
    fn comma_builds_a_list() {
        assert_eq!(
            eval("1, 'b'"),
            Ok(Value::List(vec![Value::Float(1.0), Value::Str("b".into())]))
        );
    }

    #[test]
    fn calls_receive_arguments() {
        let mut received = Vec::new();
        let mut scope = FnScope {
            variables: |name: &str| -> Result<Value, String> { Err(format!("no {name}")) },
            functions: |name: &str, args: Value| -> Result<Value, String> {
                received.push((name.to_string(), args.clone()));
                Ok(Value::Float(1.0))
            },
        };
        assert_eq!(evaluate("f() + g(2, 3)", &mut scope), Ok(Value::Float(2.0)));
        drop(scope);
        assert_eq!(received[0], ("f".to_string(), Value::List(vec![])));
        assert_eq!(
            received[1],
            (
                "g".to_string(),
                Value::List(vec![Value::Float(2.0), Value::Float(3.0)])
            )
        );
    }

    #[test]
    fn lookups_are_memoized_within_one_evaluation() {
        let mut lookups = 0;
        let mut scope = FnScope {
            variables: |_: &str| -> Result<Value, String> {
                lookups += 1;
                Ok(Value::Int(2))
            },
            functions: |_: &str, _: Value| -> Result<Value, String> { Err("none".to_string()) },
        };
        assert_eq!(evaluate("k * k + k", &mut scope), Ok(Value::Float(6.0)));
        drop(scope);
        assert_eq!(lookups, 1);
    }

    #[test]
    fn dotted_names_are_on_by_default() {
        let mut names = Vec::new();
        let mut scope = FnScope {
            variables: |name: &str| -> Result<Value, String> {
                names.push(name.to_string());
                Ok(Value::Int(1))
            },
            functions: |_: &str, _: Value| -> Result<Value, String> { Err("none".to_string()) },
        };
        assert!(evaluate("stats.health_max", &mut scope).is_ok());
        drop(scope);
        assert_eq!(names, vec!["stats.health_max".to_string()]);
        assert_eq!(EvalOptions::default(), InspectorConfig::default().eval_options());

        let options = EvalOptions {
            dotted_names: false,
        };
        assert!(matches!(
            evaluate_with("stats.health", &mut EmptyScope, options),
            Err(EvalError::UnexpectedChar { ch: '.', .. })
        ));
    }

    // --- Failures ---

    #[test]
    fn unknown_variable_reports_failure() {
        let (text, ok) = evaluate_text("unknownVar", &mut EmptyScope, EvalOptions::default());
        assert!(!ok);
        assert!(text.contains("unknownVar"));
    }

    #[test]
    fn syntax_errors() {
        assert!(matches!(eval("(1 + 2"), Err(EvalError::UnbalancedParen(_))));
        assert!(matches!(eval("1 2"), Err(EvalError::UnexpectedToken(_))));
        assert!(matches!(eval("1 +"), Err(EvalError::UnexpectedEnd)));
        assert!(matches!(eval("'open"), Err(EvalError::UnterminatedString(0))));
        assert!(matches!(eval("2 ^ 3"), Err(EvalError::UnexpectedChar { ch: '^', .. })));
        assert!(matches!(eval("1..2"), Err(EvalError::InvalidNumber(_))));
    }

    #[test]
    fn empty_expression_is_null() {
        assert_eq!(eval("   "), Ok(Value::Null));
    }
}
