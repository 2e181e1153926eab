use crate::parser::{
    Combinator, ComplexSelector, CompoundSelector, Selector, SelectorList, SelectorPart,
    parse_escaped_ident, parse_ident, split_top_level,
};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{char, multispace0},
    combinator::map,
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, preceded},
};

/// Parses a simple selector: Type, .Class, #ID, pseudo-classes and elements.
pub fn parse_simple_selector(input: &str) -> IResult<&str, Selector> {
    alt((
        map(preceded(char('#'), parse_escaped_ident), Selector::Id),
        map(preceded(char('.'), parse_escaped_ident), Selector::Class),
        map(preceded(tag("::"), parse_ident), |s| {
            Selector::PseudoElement(s.to_string())
        }),
        parse_functional_pseudo,
        map(preceded(char(':'), parse_ident), |s| {
            Selector::PseudoClass(s.to_string())
        }),
        map(char('&'), |_| Selector::Parent),
        map(char('*'), |_| Selector::Universal),
        parse_attribute_selector,
        map(parse_ident, |s| Selector::Type(s.to_string())),
    ))(input)
}

/// Parses a compound selector (e.g., "div.card:hover").
pub fn parse_compound_selector(input: &str) -> IResult<&str, CompoundSelector> {
    let (input, first) = parse_simple_selector(input)?;
    // No whitespace between simple selectors, so `.card:hover` stays one compound
    let (input, rest) = many0(parse_simple_selector)(input)?;

    let mut selectors = vec![first];
    selectors.extend(rest);
    Ok((input, CompoundSelector::new(selectors)))
}

/// Parses a complex selector with combinators (e.g., ".dark > .card").
pub fn parse_complex_selector(input: &str) -> IResult<&str, ComplexSelector> {
    let (mut input, mut current_compound) = parse_compound_selector(input)?;
    let mut parts = Vec::new();

    loop {
        let (rem, ws) = multispace0(input)?;

        let combinator_match: IResult<&str, Combinator> = alt((
            map(char('>'), |_| Combinator::Child),
            map(char('+'), |_| Combinator::AdjacentSibling),
            map(char('~'), |_| Combinator::GeneralSibling),
        ))(rem);

        if let Ok((after_op, found_combinator)) = combinator_match {
            let (after_ws, _) = multispace0(after_op)?;
            match parse_compound_selector(after_ws) {
                Ok((next_input, next_compound)) => {
                    parts.push(SelectorPart::new(current_compound, found_combinator));
                    current_compound = next_compound;
                    input = next_input;
                    continue;
                }
                Err(_) => break,
            }
        }

        // Whitespace alone is a descendant combinator
        if !ws.is_empty() {
            match parse_compound_selector(rem) {
                Ok((next_input, next_compound)) => {
                    parts.push(SelectorPart::new(current_compound, Combinator::Descendant));
                    current_compound = next_compound;
                    input = next_input;
                    continue;
                }
                Err(_) => break,
            }
        }

        break;
    }

    parts.push(SelectorPart::new(current_compound, Combinator::None));
    Ok((input, ComplexSelector::new(parts)))
}

/// Parses a full selector list, requiring the whole input to be consumed.
///
/// Returns `None` for anything outside the supported selector grammar, which
/// callers treat as "not a utility selector".
pub fn parse_selector_list(input: &str) -> Option<SelectorList> {
    let mut selectors = Vec::new();
    for branch in split_top_level(input, ',') {
        let branch = branch.trim();
        if branch.is_empty() {
            return None;
        }
        match parse_complex_selector(branch) {
            Ok((rest, complex)) if rest.trim().is_empty() => selectors.push(complex),
            _ => return None,
        }
    }
    Some(SelectorList::new(selectors))
}

/// Parses `:name(argument)`; selector-list arguments are parsed recursively.
fn parse_functional_pseudo(input: &str) -> IResult<&str, Selector> {
    let (after_name, name) = preceded(char(':'), parse_ident)(input)?;
    if !after_name.starts_with('(') {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Char)));
    }

    let mut depth = 0usize;
    for (i, c) in after_name.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let argument = &after_name[1..i];
                    let rest = &after_name[i + 1..];
                    let selector = match parse_selector_list(argument) {
                        Some(list) => Selector::Functional(name.to_string(), list),
                        None => Selector::FunctionalRaw(name.to_string(), argument.to_string()),
                    };
                    return Ok((rest, selector));
                }
            }
            _ => {}
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::TakeUntil)))
}

fn parse_attribute_selector(input: &str) -> IResult<&str, Selector> {
    let (input, content) = delimited(char('['), take_until("]"), char(']'))(input)?;

    if let Some(idx) = content.find('=') {
        let name = content[..idx].trim();
        let value = content[idx + 1..].trim();
        Ok((
            input,
            Selector::Attribute(name.to_string(), value.to_string()),
        ))
    } else {
        // Handle [attr] existence selector
        Ok((
            input,
            Selector::Attribute(content.trim().to_string(), "".to_string()),
        ))
    }
}
