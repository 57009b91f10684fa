//! `-ms-` grid declarations for legacy browsers.
//!
//! Only values the old IE grid syntax can express are prefixed: plain track
//! lists, integer line numbers and `start / end` line pairs.

use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::properties::custom::{CustomProperty, CustomPropertyName, Token, TokenList, TokenOrValue};
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::values::ident::Ident;

pub fn prefix_grid(rules: &mut CssRuleList<'_>) {
    prefix_rules(&mut rules.0);
}

fn prefix_rules(rules: &mut [CssRule<'_>]) {
    for rule in rules.iter_mut() {
        match rule {
            CssRule::Style(style) => {
                prefix_block(&mut style.declarations.declarations);
                prefix_block(&mut style.declarations.important_declarations);
                prefix_rules(&mut style.rules.0);
            }
            CssRule::Media(media) => prefix_rules(&mut media.rules.0),
            CssRule::Supports(supports) => prefix_rules(&mut supports.rules.0),
            _ => {}
        }
    }
}

fn prefix_block<'i>(declarations: &mut Vec<Property<'i>>) {
    let mut prefixed = Vec::with_capacity(declarations.len());
    for property in declarations.drain(..) {
        prefixed.extend(ms_grid(&property));
        prefixed.push(property);
    }
    *declarations = prefixed;
}

/// The `-ms-` declarations standing in for `property`, if any
fn ms_grid<'i>(property: &Property<'i>) -> Vec<Property<'i>> {
    let Ok(value) = property.value_to_css_string(PrinterOptions::default()) else {
        return Vec::new();
    };
    let value = value.trim();

    match property.property_id().name() {
        "display" => match value {
            "grid" => vec![declaration("display", vec![ident("-ms-grid")])],
            "inline-grid" => vec![declaration("display", vec![ident("-ms-inline-grid")])],
            _ => Vec::new(),
        },
        "grid-template-columns" => track_list(value)
            .map(|tokens| vec![declaration("-ms-grid-columns", tokens)])
            .unwrap_or_default(),
        "grid-template-rows" => track_list(value)
            .map(|tokens| vec![declaration("-ms-grid-rows", tokens)])
            .unwrap_or_default(),
        "grid-row" => grid_line("-ms-grid-row", "-ms-grid-row-span", value),
        "grid-column" => grid_line("-ms-grid-column", "-ms-grid-column-span", value),
        _ => Vec::new(),
    }
}

/// `start` or `start / end` with integer lines
fn grid_line<'i>(name: &str, span_name: &str, value: &str) -> Vec<Property<'i>> {
    let mut parts = value.split('/').map(str::trim);
    let Some(start) = parts.next().and_then(|part| part.parse::<i32>().ok()) else {
        return Vec::new();
    };
    let end = parts.next().map(|part| part.parse::<i32>().ok());

    let mut prefixed = vec![declaration(name, vec![integer(start)])];
    match end {
        None => {}
        Some(Some(end)) if end > start => {
            prefixed.push(declaration(span_name, vec![integer(end - start)]));
        }
        Some(_) => return Vec::new(),
    }
    prefixed
}

/// Space separated lengths, numbers and keywords; anything else is left alone
fn track_list<'i>(value: &str) -> Option<Vec<TokenOrValue<'i>>> {
    let mut tokens = Vec::new();
    for (index, part) in value.split_whitespace().enumerate() {
        if index > 0 {
            tokens.push(TokenOrValue::Token(Token::WhiteSpace(" ".into())));
        }
        tokens.push(simple_token(part)?);
    }
    (!tokens.is_empty()).then_some(tokens)
}

fn simple_token<'i>(part: &str) -> Option<TokenOrValue<'i>> {
    let split = part
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(part.len());
    let (number, unit) = part.split_at(split);

    if number.is_empty() {
        let is_keyword = part.starts_with(|c: char| c.is_ascii_alphabetic())
            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        return is_keyword.then(|| ident(part));
    }

    let value: f32 = number.parse().ok()?;
    let int_value = (value.fract() == 0.0).then_some(value as i32);
    let token = match unit {
        "" => Token::Number {
            has_sign: false,
            value,
            int_value,
        },
        "%" => Token::Percentage {
            has_sign: false,
            unit_value: value / 100.0,
            int_value,
        },
        unit if unit.chars().all(|c| c.is_ascii_alphabetic()) => Token::Dimension {
            has_sign: false,
            value,
            int_value,
            unit: unit.to_string().into(),
        },
        _ => return None,
    };
    Some(TokenOrValue::Token(token))
}

fn ident<'i>(name: &str) -> TokenOrValue<'i> {
    TokenOrValue::Token(Token::Ident(name.to_string().into()))
}

fn integer<'i>(value: i32) -> TokenOrValue<'i> {
    TokenOrValue::Token(Token::Number {
        has_sign: false,
        value: value as f32,
        int_value: Some(value),
    })
}

fn declaration<'i>(name: &str, value: Vec<TokenOrValue<'i>>) -> Property<'i> {
    Property::Custom(CustomProperty {
        name: CustomPropertyName::Unknown(Ident(name.to_string().into())),
        value: TokenList(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_list() {
        assert_eq!(track_list("1fr 100px 20%").map(|tokens| tokens.len()), Some(5));
        assert!(track_list("repeat(2, 1fr)").is_none());
        assert!(track_list("[full-start] 1fr").is_none());
    }

    #[test]
    fn test_grid_line() {
        assert_eq!(grid_line("-ms-grid-row", "-ms-grid-row-span", "2").len(), 1);
        assert_eq!(grid_line("-ms-grid-row", "-ms-grid-row-span", "1 / 3").len(), 2);
        assert!(grid_line("-ms-grid-row", "-ms-grid-row-span", "1 / span 2").is_empty());
        assert!(grid_line("-ms-grid-row", "-ms-grid-row-span", "auto").is_empty());
    }
}
