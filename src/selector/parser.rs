//! Nom parser for the selector language.
//!
//! ```text
//! list      := complex ( "," complex )*
//! complex   := compound ( ( ">" | whitespace ) compound )*
//! compound  := "$"? ( group | "*" )? simple*        (at least one part)
//! simple    := "#" ident | "[" attribute "]" | ":" pseudo
//! attribute := "?" key | "!" key | key ( op value )?
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, cut, map, map_opt, opt, value},
    error::{context, ErrorKind, ParseError, VerboseError, VerboseErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use super::ast::{AttrOp, AttrTest, Combinator, CompareOp, Complex, Compound, Literal, Pseudo};
use super::SelectorError;
use crate::types::Group;

type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

enum Simple {
    Id(String),
    Attr(AttrTest),
    Pseudo(Pseudo),
}

/// Parse a full selector list.
pub(crate) fn parse_selector(input: &str) -> Result<Vec<Complex>, SelectorError> {
    if input.trim().is_empty() {
        return Err(SelectorError::new(0, "empty selector"));
    }
    match all_consuming(selector_list)(input) {
        Ok((_, list)) => Ok(list),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(to_selector_error(input, e)),
        Err(nom::Err::Incomplete(_)) => Err(SelectorError::new(input.len(), "incomplete selector")),
    }
}

fn selector_list(input: &str) -> Res<Vec<Complex>> {
    let separator = tuple((multispace0, char(','), multispace0));
    let (input, (first, rest)) = delimited(
        multispace0,
        pair(
            complex,
            many0(preceded(separator, cut(context("selector after ','", complex)))),
        ),
        multispace0,
    )(input)?;
    let mut list = vec![first];
    list.extend(rest);
    Ok((input, list))
}

fn child_combinator(input: &str) -> Res<char> {
    delimited(multispace0, char('>'), multispace0)(input)
}

fn descendant_gap(input: &str) -> Res<&str> {
    multispace1(input)
}

fn complex(start: &str) -> Res<Complex> {
    let (mut input, first) = compound(start)?;
    let mut compounds = vec![first];
    let mut combinators = Vec::new();

    loop {
        if let Ok((rest, _)) = child_combinator(input) {
            let (rest, next) = cut(context("selector after '>'", compound))(rest)?;
            combinators.push(Combinator::Child);
            compounds.push(next);
            input = rest;
            continue;
        }
        if let Ok((rest, _)) = descendant_gap(input) {
            match compound(rest) {
                Ok((rest, next)) => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(next);
                    input = rest;
                    continue;
                }
                Err(nom::Err::Failure(e)) => return Err(nom::Err::Failure(e)),
                Err(_) => {}
            }
        }
        break;
    }

    let marked: Vec<usize> = compounds
        .iter()
        .enumerate()
        .filter(|(_, c)| c.subject)
        .map(|(i, _)| i)
        .collect();
    if marked.len() > 1 {
        return Err(nom::Err::Failure(VerboseError {
            errors: vec![(start, VerboseErrorKind::Context("at most one '$' subject"))],
        }));
    }
    let subject = marked.first().copied().unwrap_or(compounds.len() - 1);

    Ok((
        input,
        Complex {
            compounds,
            combinators,
            subject,
        },
    ))
}

fn compound(input: &str) -> Res<Compound> {
    let (input, subject) = map(opt(char('$')), |m| m.is_some())(input)?;
    let (input, group) = opt(group_or_universal)(input)?;
    let (input, simples) = many0(simple)(input)?;

    if group.is_none() && simples.is_empty() {
        return Err(nom::Err::Error(VerboseError {
            errors: vec![(input, VerboseErrorKind::Context("element selector"))],
        }));
    }

    let mut compound = Compound {
        group: group.flatten(),
        subject,
        ..Compound::default()
    };
    for s in simples {
        match s {
            Simple::Id(id) => compound.ids.push(id),
            Simple::Attr(attr) => compound.attrs.push(attr),
            Simple::Pseudo(p) => compound.pseudos.push(p),
        }
    }
    Ok((input, compound))
}

/// `*` yields `None` (any group), a group name yields `Some`.
fn group_or_universal(input: &str) -> Res<Option<Group>> {
    alt((
        value(None, char('*')),
        map_opt(take_while1(|c: char| c.is_ascii_alphabetic()), |name: &str| {
            Group::from_name(name).map(Some)
        }),
    ))(input)
}

fn simple(input: &str) -> Res<Simple> {
    alt((
        map(
            preceded(char('#'), cut(context("identifier after '#'", ident))),
            Simple::Id,
        ),
        map(
            preceded(
                char('['),
                cut(terminated(
                    context("attribute test", attribute),
                    context("closing ']'", char(']')),
                )),
            ),
            Simple::Attr,
        ),
        map(
            preceded(char(':'), cut(context("known pseudo-class", pseudo))),
            Simple::Pseudo,
        ),
    ))(input)
}

fn pseudo(input: &str) -> Res<Pseudo> {
    map_opt(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '-'),
        Pseudo::from_name,
    )(input)
}

/// Identifier characters: alphanumerics, `_` and `-`; any other character
/// may be included with a backslash escape.
fn ident(input: &str) -> Res<String> {
    let mut out = String::new();
    let mut end = 0;
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some((j, escaped)) => {
                    out.push(escaped);
                    end = j + escaped.len_utf8();
                }
                None => break,
            }
        } else if c.is_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    if out.is_empty() {
        return Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::AlphaNumeric,
        )));
    }
    Ok((&input[end..], out))
}

fn attribute(input: &str) -> Res<AttrTest> {
    let comparison = tuple((
        multispace0,
        compare_op,
        multispace0,
        cut(context("comparison value", literal)),
    ));
    delimited(
        multispace0,
        alt((
            map(preceded(char('?'), cut(ident)), |key| AttrTest {
                key,
                op: AttrOp::Truthy,
            }),
            map(preceded(char('!'), cut(ident)), |key| AttrTest {
                key,
                op: AttrOp::Falsy,
            }),
            map(pair(ident, opt(comparison)), |(key, cmp)| AttrTest {
                key,
                op: match cmp {
                    None => AttrOp::Exists,
                    Some((_, op, _, lit)) => AttrOp::Compare(op, lit),
                },
            }),
        )),
        multispace0,
    )(input)
}

fn compare_op(input: &str) -> Res<CompareOp> {
    alt((
        value(CompareOp::Ge, tag(">=")),
        value(CompareOp::Le, tag("<=")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::StartsWith, tag("^=")),
        value(CompareOp::EndsWith, tag("$=")),
        value(CompareOp::Contains, tag("*=")),
        value(CompareOp::Eq, tag("=")),
        value(CompareOp::Gt, tag(">")),
        value(CompareOp::Lt, tag("<")),
    ))(input)
}

fn literal(input: &str) -> Res<Literal> {
    alt((
        map(
            alt((
                delimited(char('"'), take_until("\""), char('"')),
                delimited(char('\''), take_until("'"), char('\'')),
            )),
            |s: &str| Literal::Str(s.to_string()),
        ),
        map(
            take_while1(|c: char| c.is_alphanumeric() || "_-.+".contains(c)),
            classify_word,
        ),
    ))(input)
}

fn classify_word(word: &str) -> Literal {
    match word {
        "true" => Literal::Bool(true),
        "false" => Literal::Bool(false),
        _ => {
            let numeric = word
                .chars()
                .all(|c| c.is_ascii_digit() || "+-.eE".contains(c));
            match word.parse::<f64>() {
                Ok(n) if numeric => Literal::Num(n),
                _ => Literal::Str(word.to_string()),
            }
        }
    }
}

fn to_selector_error(input: &str, e: VerboseError<&str>) -> SelectorError {
    let chosen = e
        .errors
        .iter()
        .find(|(_, kind)| matches!(kind, VerboseErrorKind::Context(_)))
        .or_else(|| e.errors.first());
    let Some((at, kind)) = chosen else {
        return SelectorError::new(0, "invalid selector");
    };
    let position = input.len() - at.len();
    let message = match kind {
        VerboseErrorKind::Context(ctx) => format!("expected {ctx}"),
        VerboseErrorKind::Char(c) => format!("expected '{c}'"),
        VerboseErrorKind::Nom(_) => match at.chars().next() {
            Some(c) => format!("unexpected '{c}'"),
            None => "unexpected end of selector".to_string(),
        },
    };
    SelectorError::new(position, message)
}
