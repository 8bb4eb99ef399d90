//! Arithmetic formulas for formula-priced products.
//!
//! A formula such as `BASE * QTY + FINISH_COST * 1.2` is evaluated over a
//! fixed variable table. Variable names are case-insensitive and are replaced
//! by their values as text first, so `2BASE` with `BASE = 30` reads `230`.
//! After substitution only numbers, `+ - * /`, parentheses and whitespace are
//! accepted; anything else rejects the whole formula before any parsing happens.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

const MAX_DEPTH: usize = 64;
const PREFIX_BP: u8 = 5;

/// Values bound to the variable names a formula may reference.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FormulaVariables {
    pub base: Decimal,
    pub qty: Decimal,
    pub area: Decimal,
    pub material_cost: Decimal,
    pub print_cost: Decimal,
    pub finish_cost: Decimal,
    pub option_cost: Decimal,
}

impl FormulaVariables {
    /// Unknown names read as zero.
    pub fn lookup(&self, name: &str) -> Decimal {
        match name {
            "BASE" => self.base,
            "QTY" => self.qty,
            "AREA" => self.area,
            "MATERIAL_COST" => self.material_cost,
            "PRINT_COST" => self.print_cost,
            "FINISH_COST" => self.finish_cost,
            "OPTION_COST" => self.option_cost,
            _ => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,
    #[error("disallowed character {0:?} at offset {1}")]
    UnsafeCharacter(char, usize),
    #[error("malformed number {0:?}")]
    InvalidNumber(String),
    #[error("unexpected token at position {0}")]
    UnexpectedToken(usize),
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("formula nests too deeply")]
    TooDeep,
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(Decimal),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn is_variable_char(c: char) -> bool { c.is_ascii_alphabetic() || c == '_' }

fn is_permitted(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
}

/// Evaluate `formula` against `vars`.
pub fn evaluate(formula: &str, vars: &FormulaVariables) -> Result<Decimal, FormulaError> {
    let expression = substitute(formula, vars);
    if let Some((offset, c)) = expression.char_indices().find(|&(_, c)| !is_permitted(c)) {
        return Err(FormulaError::UnsafeCharacter(c, offset));
    }
    let tokens = tokenize(&expression)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let value = parser.expression(0)?;
    if parser.pos < parser.tokens.len() {
        return Err(FormulaError::UnexpectedToken(parser.pos));
    }
    Ok(value)
}

/// Evaluate `formula`, returning `fallback` (and logging a warning) when it
/// is missing, rejected or does not produce a number.
pub fn evaluate_or(formula: Option<&str>, vars: &FormulaVariables, fallback: Decimal) -> Decimal {
    let formula = formula.unwrap_or_default();
    match evaluate(formula, vars) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(formula, error = %e, %fallback, "formula evaluation failed, using fallback price");
            fallback
        }
    }
}

/// Replace every run of ASCII letters and `_` with the value of the
/// upper-cased name. The output never contains a letter.
fn substitute(formula: &str, vars: &FormulaVariables) -> String {
    let mut out = String::with_capacity(formula.len());
    let mut name = String::new();
    for c in formula.chars().chain(std::iter::once(' ')) {
        if is_variable_char(c) {
            name.push(c.to_ascii_uppercase());
            continue;
        }
        if !name.is_empty() {
            out.push_str(&vars.lookup(&name).to_string());
            name.clear();
        }
        out.push(c);
    }
    out.pop();
    out
}

fn tokenize(expression: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<(usize, char)> = expression.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let (offset, c) = chars[i];
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].1.is_ascii_digit() || chars[i].1 == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().map(|&(_, c)| c).collect();
            tokens.push(Token::Number(parse_number(&text)?));
            continue;
        }
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_whitespace() => { i += 1; continue; }
            other => return Err(FormulaError::UnsafeCharacter(other, offset)),
        };
        tokens.push(token);
        i += 1;
    }
    Ok(tokens)
}

fn parse_number(text: &str) -> Result<Decimal, FormulaError> {
    let invalid = || FormulaError::InvalidNumber(text.to_string());
    if text == "." || text.matches('.').count() > 1 {
        return Err(invalid());
    }
    let mut normalized = text.trim_end_matches('.').to_string();
    if normalized.starts_with('.') {
        normalized.insert(0, '0');
    }
    Decimal::from_str(&normalized).map_err(|_| invalid())
}

fn infix_binding_power(token: Token) -> Option<(u8, u8)> {
    match token {
        Token::Plus | Token::Minus => Some((1, 2)),
        Token::Star | Token::Slash => Some((3, 4)),
        _ => None,
    }
}

fn apply(op: Token, lhs: Decimal, rhs: Decimal) -> Result<Decimal, FormulaError> {
    let result = match op {
        Token::Plus => lhs.checked_add(rhs),
        Token::Minus => lhs.checked_sub(rhs),
        Token::Star => lhs.checked_mul(rhs),
        Token::Slash if rhs.is_zero() => return Err(FormulaError::DivisionByZero),
        Token::Slash => lhs.checked_div(rhs),
        _ => None,
    };
    result.ok_or(FormulaError::Overflow)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self, min_bp: u8) -> Result<Decimal, FormulaError> {
        let mut lhs = self.prefix()?;
        while let Some(&op) = self.tokens.get(self.pos) {
            let Some((l_bp, r_bp)) = infix_binding_power(op) else { break };
            if l_bp < min_bp {
                break;
            }
            self.pos += 1;
            let rhs = self.expression(r_bp)?;
            lhs = apply(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn prefix(&mut self) -> Result<Decimal, FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep);
        }
        let value = match self.next() {
            Some(Token::Number(n)) => n,
            Some(Token::Minus) => -self.expression(PREFIX_BP)?,
            Some(Token::Plus) => self.expression(PREFIX_BP)?,
            Some(Token::LParen) => {
                let inner = self.expression(0)?;
                match self.next() {
                    Some(Token::RParen) => inner,
                    Some(_) => return Err(FormulaError::UnexpectedToken(self.pos - 1)),
                    None => return Err(FormulaError::UnexpectedEnd),
                }
            }
            Some(_) => return Err(FormulaError::UnexpectedToken(self.pos - 1)),
            None => return Err(FormulaError::UnexpectedEnd),
        };
        self.depth -= 1;
        Ok(value)
    }
}
