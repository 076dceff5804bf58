//! A lexer and recursive-descent parser for the named s-expression syntax.
//!
//! ```text
//! term ::= Type | TypeN | name | ?n
//!        | (Pi x A B) | (-> A B) | (lam x b) | (lam (x A) b) | (f a b ...)
//!        | (Sigma x A B) | (pair a b) | (fst p) | (snd p)
//!        | (let x v b) | (let (x A) v b)
//!        | (Id A x y) | (refl A x) | (J A C d x y p)
//! ```
//!
//! With the `cubical` feature the interval forms are also recognized: `I`,
//! `i0`, `i1`, `(Path A x y)`, `(PathP i A x y)`, `(plam i t)`, `(@ p r)`,
//! `(transport i A e)`, `(Partial φ A)`, `(system [φ t] ...)`,
//! `(comp i A φ u a)`, `(hcomp A φ j u a)`, `(fill i A φ u a)`,
//! `(Glue A [φ T e] ...)`, `(glue a [φ t] ...)`, `(unglue A g)`,
//! `(ua A B e)`, `(ua-beta e a)` and `(hit H c (args ...) (dims ...))`.
//! Faces are `top`, `bot`, `(= i 0)`, `(= i 1)`, `(and φ ψ)` and `(or φ ψ)`.

#[cfg(feature = "cubical")]
use crate::syn::raw::{RawBranch, RawCubical, RawDim, RawFace, RawGlueBranch};
use crate::syn::raw::{BoxRaw, Raw};
use logos::{Lexer, Logos};
use std::fmt;
use std::num::ParseIntError;
use std::ops::Range;

#[derive(thiserror::Error, Default, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid token at {0:?}")]
    InvalidToken(Range<usize>),
    #[error("invalid integer: {0}")]
    InvalidInteger(String),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("expected `)`, found {0}")]
    MissingRParen(String),
    #[error("expected `]`, found {0}")]
    MissingRBracket(String),
    #[error("expected a name, found {0}")]
    MissingName(String),
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("unknown form `{0}`")]
    UnknownForm(String),
    #[error("trailing input after term: {0}")]
    TrailingInput(String),
    #[default]
    #[error("unrecognized input")]
    Unrecognized,
}

impl Error {
    fn from_lexer(lex: &mut Lexer<'_, Token>) -> Self {
        Error::InvalidToken(lex.span())
    }
}

impl From<ParseIntError> for Error {
    fn from(err: ParseIntError) -> Self {
        use std::num::IntErrorKind::{NegOverflow, PosOverflow};
        match err.kind() {
            PosOverflow | NegOverflow => Error::InvalidInteger("overflow".to_owned()),
            _ => Error::InvalidInteger(err.to_string()),
        }
    }
}

type ParseResult<T> = std::result::Result<T, Error>;

fn lex_universe(lex: &mut Lexer<'_, Token>) -> Result<usize, ParseIntError> {
    match &lex.slice()["Type".len()..] {
        "" => Ok(0),
        digits => digits.parse(),
    }
}

#[derive(Logos, Clone, Debug, Eq, PartialEq, Hash)]
#[logos(error(Error, Error::from_lexer))]
// Whitespace
#[logos(skip r"\p{Whitespace}+")]
// Comments
#[logos(skip r";[^\n]*")]
pub enum Token {
    #[token("(", priority = 10)]
    LParen,
    #[token(")", priority = 10)]
    RParen,
    #[token("[", priority = 10)]
    LBracket,
    #[token("]", priority = 10)]
    RBracket,
    #[regex(r"Type[0-9]*", priority = 6, callback = lex_universe)]
    Universe(usize),
    #[regex(r"\?[0-9]+", priority = 6, callback = |lex| lex.slice()["?".len()..].parse())]
    Metavariable(usize),
    #[regex(r"[0-9]+", priority = 5, callback = |lex| lex.slice().parse())]
    Integer(usize),
    #[regex(r"[^\p{Whitespace}()\[\];?]+", priority = 2, callback = |lex| lex.slice().to_owned())]
    Ident(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => f.write_str("`(`"),
            Token::RParen => f.write_str("`)`"),
            Token::LBracket => f.write_str("`[`"),
            Token::RBracket => f.write_str("`]`"),
            Token::Universe(n) => write!(f, "`Type{n}`"),
            Token::Metavariable(n) => write!(f, "`?{n}`"),
            Token::Integer(n) => write!(f, "`{n}`"),
            Token::Ident(name) => write!(f, "`{name}`"),
        }
    }
}

struct State<'input> {
    lexer: Lexer<'input, Token>,
    /// The current token. We support single token peeking.
    token: Option<ParseResult<Token>>,
}

impl<'input> State<'input> {
    fn new(input: &'input str) -> State<'input> {
        let mut lexer = Token::lexer(input);
        let token = lexer.next();
        State { lexer, token }
    }

    fn peek(&self) -> ParseResult<Option<&Token>> {
        match &self.token {
            None => Ok(None),
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(err)) => Err(err.clone()),
        }
    }

    fn advance(&mut self) {
        self.token = self.lexer.next();
    }

    /// Take the current token, failing at the end of input.
    fn next(&mut self) -> ParseResult<Token> {
        match self.token.take() {
            None => Err(Error::UnexpectedEnd),
            Some(result) => {
                self.advance();
                result
            }
        }
    }

    fn describe(&self) -> String {
        match &self.token {
            None => "end of input".to_owned(),
            Some(Ok(token)) => token.to_string(),
            Some(Err(err)) => err.to_string(),
        }
    }

    fn eat(&mut self, token: &Token) -> ParseResult<bool> {
        if self.peek()? == Some(token) {
            self.advance();
            return Ok(true);
        }
        Ok(false)
    }

    fn at_close(&self) -> ParseResult<bool> {
        Ok(matches!(self.peek()?, Some(Token::RParen) | None))
    }
}

fn p_rparen(state: &mut State) -> ParseResult<()> {
    if state.eat(&Token::RParen)? {
        return Ok(());
    }
    match state.peek()? {
        None => Err(Error::UnexpectedEnd),
        Some(_) => Err(Error::MissingRParen(state.describe())),
    }
}

fn p_name(state: &mut State) -> ParseResult<String> {
    match state.peek()? {
        Some(Token::Ident(_)) => match state.next()? {
            Token::Ident(name) => Ok(name),
            _ => Err(Error::Unrecognized),
        },
        None => Err(Error::UnexpectedEnd),
        Some(_) => Err(Error::MissingName(state.describe())),
    }
}

fn p_boxed(state: &mut State) -> ParseResult<BoxRaw> {
    p_term(state).map(Box::new)
}

/// A binder, `x` or `(x A)`.
fn p_binder(state: &mut State) -> ParseResult<(String, Option<BoxRaw>)> {
    if state.eat(&Token::LParen)? {
        let name = p_name(state)?;
        let ty = p_boxed(state)?;
        p_rparen(state)?;
        return Ok((name, Some(ty)));
    }
    Ok((p_name(state)?, None))
}

fn p_atom(name: String) -> Raw {
    #[cfg(feature = "cubical")]
    match name.as_str() {
        "I" => return Raw::Cubical(RawCubical::Interval),
        "i0" => return Raw::Cubical(RawCubical::Dim(RawDim::Zero)),
        "i1" => return Raw::Cubical(RawCubical::Dim(RawDim::One)),
        _ => {}
    }
    Raw::Name(name)
}

fn p_term(state: &mut State) -> ParseResult<Raw> {
    match state.next()? {
        Token::Universe(level) => Ok(Raw::Universe(level)),
        Token::Metavariable(id) => Ok(Raw::Metavariable(id)),
        Token::Ident(name) => Ok(p_atom(name)),
        Token::LParen => p_form(state),
        token => Err(Error::UnexpectedToken(token.to_string())),
    }
}

/// The remainder of a parenthesized form, after the `(`.
fn p_form(state: &mut State) -> ParseResult<Raw> {
    let keyword = match state.peek()? {
        Some(Token::Ident(name)) => Some(name.clone()),
        _ => None,
    };
    if let Some(keyword) = keyword {
        if let Some(raw) = p_keyword_form(state, &keyword)? {
            p_rparen(state)?;
            return Ok(raw);
        }
    }
    let function = p_term(state)?;
    let mut arguments = Vec::new();
    while !state.at_close()? {
        arguments.push(p_term(state)?);
    }
    p_rparen(state)?;
    if arguments.is_empty() {
        return Ok(function);
    }
    Ok(Raw::Application {
        function: Box::new(function),
        arguments,
    })
}

/// Parse the body of a keyword form. Returns `None`, consuming nothing, if
/// `keyword` names no form.
fn p_keyword_form(state: &mut State, keyword: &str) -> ParseResult<Option<Raw>> {
    let raw = match keyword {
        "Pi" => {
            state.advance();
            Raw::Pi {
                name: p_name(state)?,
                source: p_boxed(state)?,
                target: p_boxed(state)?,
            }
        }
        "->" => {
            state.advance();
            Raw::Arrow {
                source: p_boxed(state)?,
                target: p_boxed(state)?,
            }
        }
        "lam" => {
            state.advance();
            let (name, annotation) = p_binder(state)?;
            Raw::Lambda {
                name,
                annotation,
                body: p_boxed(state)?,
            }
        }
        "Sigma" => {
            state.advance();
            Raw::Sigma {
                name: p_name(state)?,
                first: p_boxed(state)?,
                second: p_boxed(state)?,
            }
        }
        "pair" => {
            state.advance();
            Raw::Pair {
                first: p_boxed(state)?,
                second: p_boxed(state)?,
            }
        }
        "fst" => {
            state.advance();
            Raw::Fst(p_boxed(state)?)
        }
        "snd" => {
            state.advance();
            Raw::Snd(p_boxed(state)?)
        }
        "let" => {
            state.advance();
            let (name, annotation) = p_binder(state)?;
            Raw::Let {
                name,
                annotation,
                value: p_boxed(state)?,
                body: p_boxed(state)?,
            }
        }
        "Id" => {
            state.advance();
            Raw::Id {
                ty: p_boxed(state)?,
                lhs: p_boxed(state)?,
                rhs: p_boxed(state)?,
            }
        }
        "refl" => {
            state.advance();
            Raw::Refl {
                ty: p_boxed(state)?,
                point: p_boxed(state)?,
            }
        }
        "J" => {
            state.advance();
            Raw::J {
                ty: p_boxed(state)?,
                motive: p_boxed(state)?,
                base: p_boxed(state)?,
                lhs: p_boxed(state)?,
                rhs: p_boxed(state)?,
                proof: p_boxed(state)?,
            }
        }
        #[cfg(feature = "cubical")]
        _ => match p_cubical_form(state, keyword)? {
            Some(c) => Raw::Cubical(c),
            None => return Ok(None),
        },
        #[cfg(not(feature = "cubical"))]
        _ => return Ok(None),
    };
    Ok(Some(raw))
}

#[cfg(feature = "cubical")]
fn p_dim(state: &mut State) -> ParseResult<RawDim> {
    let name = p_name(state)?;
    Ok(match name.as_str() {
        "i0" => RawDim::Zero,
        "i1" => RawDim::One,
        _ => RawDim::Name(name),
    })
}

#[cfg(feature = "cubical")]
fn p_face(state: &mut State) -> ParseResult<RawFace> {
    match state.next()? {
        Token::Ident(name) if name == "top" => Ok(RawFace::Top),
        Token::Ident(name) if name == "bot" => Ok(RawFace::Bot),
        Token::LParen => {
            let face = match p_name(state)?.as_str() {
                "=" => {
                    let var = p_name(state)?;
                    let is_one = match state.next()? {
                        Token::Integer(0) => false,
                        Token::Integer(1) => true,
                        token => return Err(Error::UnexpectedToken(token.to_string())),
                    };
                    RawFace::Eq(var, is_one)
                }
                "and" => RawFace::And(Box::new(p_face(state)?), Box::new(p_face(state)?)),
                "or" => RawFace::Or(Box::new(p_face(state)?), Box::new(p_face(state)?)),
                other => return Err(Error::UnknownForm(other.to_owned())),
            };
            p_rparen(state)?;
            Ok(face)
        }
        token => Err(Error::UnexpectedToken(token.to_string())),
    }
}

/// Parse bracketed groups `[...]` until the closing parenthesis.
#[cfg(feature = "cubical")]
fn p_groups<T, F>(state: &mut State, mut group: F) -> ParseResult<Vec<T>>
where
    F: FnMut(&mut State) -> ParseResult<T>,
{
    let mut out = Vec::new();
    while state.eat(&Token::LBracket)? {
        out.push(group(state)?);
        if !state.eat(&Token::RBracket)? {
            return Err(Error::MissingRBracket(state.describe()));
        }
    }
    Ok(out)
}

#[cfg(feature = "cubical")]
fn p_branches(state: &mut State) -> ParseResult<Vec<RawBranch>> {
    p_groups(state, |state| {
        Ok(RawBranch {
            face: p_face(state)?,
            term: p_term(state)?,
        })
    })
}

/// A parenthesized list of items.
#[cfg(feature = "cubical")]
fn p_list<T, F>(state: &mut State, mut item: F) -> ParseResult<Vec<T>>
where
    F: FnMut(&mut State) -> ParseResult<T>,
{
    match state.next()? {
        Token::LParen => {}
        token => return Err(Error::UnexpectedToken(token.to_string())),
    }
    let mut out = Vec::new();
    while !state.at_close()? {
        out.push(item(state)?);
    }
    p_rparen(state)?;
    Ok(out)
}

#[cfg(feature = "cubical")]
fn p_cubical_form(state: &mut State, keyword: &str) -> ParseResult<Option<RawCubical>> {
    let known = matches!(
        keyword,
        "Path"
            | "PathP"
            | "plam"
            | "@"
            | "transport"
            | "Partial"
            | "system"
            | "comp"
            | "hcomp"
            | "fill"
            | "Glue"
            | "glue"
            | "unglue"
            | "ua"
            | "ua-beta"
            | "hit"
    );
    if !known {
        return Ok(None);
    }
    state.advance();
    let c = match keyword {
        "Path" => RawCubical::Path {
            ty: p_boxed(state)?,
            lhs: p_boxed(state)?,
            rhs: p_boxed(state)?,
        },
        "PathP" => RawCubical::PathP {
            name: p_name(state)?,
            family: p_boxed(state)?,
            lhs: p_boxed(state)?,
            rhs: p_boxed(state)?,
        },
        "plam" => RawCubical::PathLambda {
            name: p_name(state)?,
            body: p_boxed(state)?,
        },
        "@" => RawCubical::PathApplication {
            path: p_boxed(state)?,
            dimension: p_dim(state)?,
        },
        "transport" => RawCubical::Transport {
            name: p_name(state)?,
            family: p_boxed(state)?,
            base: p_boxed(state)?,
        },
        "Partial" => RawCubical::Partial {
            face: p_face(state)?,
            ty: p_boxed(state)?,
        },
        "system" => RawCubical::System(p_branches(state)?),
        "comp" => RawCubical::Comp {
            name: p_name(state)?,
            family: p_boxed(state)?,
            face: p_face(state)?,
            tube: p_boxed(state)?,
            base: p_boxed(state)?,
        },
        "hcomp" => RawCubical::HComp {
            ty: p_boxed(state)?,
            face: p_face(state)?,
            name: p_name(state)?,
            tube: p_boxed(state)?,
            base: p_boxed(state)?,
        },
        "fill" => RawCubical::Fill {
            name: p_name(state)?,
            family: p_boxed(state)?,
            face: p_face(state)?,
            tube: p_boxed(state)?,
            base: p_boxed(state)?,
        },
        "Glue" => RawCubical::Glue {
            ty: p_boxed(state)?,
            branches: p_groups(state, |state| {
                Ok(RawGlueBranch {
                    face: p_face(state)?,
                    fiber: p_term(state)?,
                    equiv: p_term(state)?,
                })
            })?,
        },
        "glue" => RawCubical::GlueElem {
            base: p_boxed(state)?,
            branches: p_branches(state)?,
        },
        "unglue" => RawCubical::Unglue {
            ty: p_boxed(state)?,
            glued: p_boxed(state)?,
        },
        "ua" => RawCubical::Ua {
            lhs: p_boxed(state)?,
            rhs: p_boxed(state)?,
            equiv: p_boxed(state)?,
        },
        "ua-beta" => RawCubical::UaBeta {
            equiv: p_boxed(state)?,
            argument: p_boxed(state)?,
        },
        "hit" => RawCubical::Hit {
            hit: p_name(state)?,
            constructor: p_name(state)?,
            arguments: p_list(state, p_term)?,
            dimensions: p_list(state, p_dim)?,
        },
        _ => return Err(Error::UnknownForm(keyword.to_owned())),
    };
    Ok(Some(c))
}

/// Parse a single term, rejecting trailing input.
pub fn parse(input: &str) -> ParseResult<Raw> {
    let mut state = State::new(input);
    let raw = p_term(&mut state)?;
    if state.peek()?.is_some() {
        return Err(Error::TrailingInput(state.describe()));
    }
    Ok(raw)
}
