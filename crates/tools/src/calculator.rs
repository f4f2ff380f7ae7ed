//! Calculator tool: constrained arithmetic.
//!
//! Accepts numbers, `+ - * /`, parentheses and unary minus, nothing else.
//! Expressions are tokenized and evaluated by a small recursive-descent
//! parser; there is no path to a general-purpose evaluator.

use async_trait::async_trait;
use riskcast_core::error::ToolError;
use riskcast_core::tool::{Tool, ToolResult};
use thiserror::Error;

/// Characters that survive [`filter_expression`].
pub const EXPRESSION_CHARS: &str = "0123456789+-*/(). ";

/// Parenthesis nesting limit.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected {found} at token {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("missing closing parenthesis")]
    UnclosedParen,

    #[error("parentheses nested deeper than {MAX_DEPTH}")]
    TooDeep,

    #[error("division by zero")]
    DivisionByZero,
}

/// Keep only arithmetic characters from free text, e.g. a task that says
/// "calculate 12 * (3 + 4) please" becomes `" 12 * (3 + 4) "`.
pub fn filter_expression(text: &str) -> String {
    text.chars().filter(|c| EXPRESSION_CHARS.contains(*c)).collect()
}

/// Render a result without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expr: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }
    let mut parser = Parser { tokens: &tokens, pos: 0, depth: 0 };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(CalcError::UnexpectedToken {
            found: tok.describe(),
            position: parser.pos,
        });
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Op(char),
    Open,
    Close,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Num(n) => format!("number {}", format_number(*n)),
            Token::Op(c) => format!("operator '{c}'"),
            Token::Open => "'('".into(),
            Token::Close => "')'".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' | '-' | '*' | '/' => {
                tokens.push(Token::Op(ch));
                chars.next();
            }
            '(' => {
                tokens.push(Token::Open);
                chars.next();
            }
            ')' => {
                tokens.push(Token::Close);
                chars.next();
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if !(d.is_ascii_digit() || d == '.') {
                        break;
                    }
                    literal.push(d);
                    chars.next();
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Num(value));
            }
            _ => return Err(CalcError::UnexpectedChar { ch, offset }),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut acc = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            if op == '+' {
                acc += rhs;
            } else {
                acc -= rhs;
            }
        }
        Ok(acc)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, CalcError> {
        let mut acc = self.factor()?;
        while let Some(Token::Op(op @ ('*' | '/'))) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            if op == '*' {
                acc *= rhs;
            } else if rhs == 0.0 {
                return Err(CalcError::DivisionByZero);
            } else {
                acc /= rhs;
            }
        }
        Ok(acc)
    }

    // factor := ('-' | '+')* primary
    //
    // Signs are folded in a loop, so a long run of them costs no stack.
    fn factor(&mut self) -> Result<f64, CalcError> {
        let mut negate = false;
        while let Some(Token::Op(sign @ ('-' | '+'))) = self.peek() {
            self.pos += 1;
            negate ^= sign == '-';
        }
        let value = self.primary()?;
        Ok(if negate { -value } else { value })
    }

    // primary := NUMBER | '(' expr ')'
    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::Open) => {
                self.depth += 1;
                if self.depth > MAX_DEPTH {
                    return Err(CalcError::TooDeep);
                }
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::Close) => Ok(value),
                    Some(_) | None => Err(CalcError::UnclosedParen),
                }
            }
            Some(tok) => Err(CalcError::UnexpectedToken {
                found: tok.describe(),
                position: self.pos - 1,
            }),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate an arithmetic expression. Supports +, -, *, /, parentheses, unary minus and decimal numbers."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Arithmetic expression, e.g. '(120 - 45) / 5'"
                }
            },
            "required": ["expression"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let expr = arguments["expression"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'expression' argument".into()))?;

        Ok(match evaluate(expr) {
            Ok(value) => ToolResult {
                call_id: String::new(),
                success: true,
                output: format_number(value),
                data: Some(serde_json::json!({ "result": value })),
            },
            Err(e) => ToolResult {
                call_id: String::new(),
                success: false,
                output: format!("Error: {e}"),
                data: None,
            },
        })
    }
}
