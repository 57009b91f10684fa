//! `var()` substitution over a parsed stylesheet.
//!
//! Values are taken from custom property declarations in `:root` rules,
//! including `:root` rules nested in `@media` and `@supports`. References
//! with no known value fall back to their `var()` fallback, or are left as is.

use buildlib_core::css::CustomProperties;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::properties::custom::{
    CustomProperty, CustomPropertyName, TokenList, TokenOrValue, UnparsedProperty,
};
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::selector::SelectorList;
use lightningcss::traits::ToCss;
use std::collections::HashMap;

/// Nesting limit for variables defined in terms of other variables
const MAX_DEPTH: usize = 16;

pub type Variables<'i> = HashMap<String, TokenList<'i>>;

pub fn collect_root_variables<'i>(rules: &CssRuleList<'i>) -> Variables<'i> {
    let mut variables = HashMap::new();
    collect_into(&rules.0, &mut variables);
    variables
}

fn collect_into<'i>(rules: &[CssRule<'i>], variables: &mut Variables<'i>) {
    for rule in rules {
        match rule {
            CssRule::Style(style) => {
                if is_root(&style.selectors) {
                    let declarations = style
                        .declarations
                        .declarations
                        .iter()
                        .chain(style.declarations.important_declarations.iter());
                    for property in declarations {
                        if let Property::Custom(custom) = property {
                            variables.insert(custom_name(&custom.name), custom.value.clone());
                        }
                    }
                }
                collect_into(&style.rules.0, variables);
            }
            CssRule::Media(media) => collect_into(&media.rules.0, variables),
            CssRule::Supports(supports) => collect_into(&supports.rules.0, variables),
            _ => {}
        }
    }
}

/// Rewrite declarations according to `mode`.
///
/// `Strip` replaces resolvable references with their values, then removes
/// the `:root` declarations and any style rule left empty. `Computed` keeps
/// everything and puts a resolved copy in front of each declaration whose
/// references all resolve.
pub fn apply<'i>(rules: &mut CssRuleList<'i>, variables: &Variables<'i>, mode: CustomProperties) {
    apply_rules(&mut rules.0, variables, mode);
}

fn apply_rules<'i>(rules: &mut Vec<CssRule<'i>>, variables: &Variables<'i>, mode: CustomProperties) {
    for rule in rules.iter_mut() {
        match rule {
            CssRule::Style(style) => {
                let root = is_root(&style.selectors);
                apply_block(&mut style.declarations.declarations, root, variables, mode);
                apply_block(
                    &mut style.declarations.important_declarations,
                    root,
                    variables,
                    mode,
                );
                apply_rules(&mut style.rules.0, variables, mode);
            }
            CssRule::Media(media) => apply_rules(&mut media.rules.0, variables, mode),
            CssRule::Supports(supports) => apply_rules(&mut supports.rules.0, variables, mode),
            _ => {}
        }
    }

    if mode == CustomProperties::Strip {
        rules.retain(|rule| !is_empty_style_rule(rule));
    }
}

fn apply_block<'i>(
    declarations: &mut Vec<Property<'i>>,
    root: bool,
    variables: &Variables<'i>,
    mode: CustomProperties,
) {
    let mut rewritten = Vec::with_capacity(declarations.len());

    for property in declarations.drain(..) {
        match mode {
            CustomProperties::Strip => {
                if root && matches!(property, Property::Custom(_)) {
                    continue;
                }
                rewritten.push(substitute(&property, variables).unwrap_or(property));
            }
            CustomProperties::Computed => {
                if !matches!(property, Property::Custom(_)) {
                    if let Some(computed) = substitute(&property, variables) {
                        if !property_has_var(&computed) {
                            rewritten.push(computed);
                        }
                    }
                }
                rewritten.push(property);
            }
        }
    }

    *declarations = rewritten;
}

/// The property with its references resolved, if any reference changed
fn substitute<'i>(property: &Property<'i>, variables: &Variables<'i>) -> Option<Property<'i>> {
    match property {
        Property::Unparsed(unparsed) => {
            resolve(&unparsed.value, variables, 0).map(|value| {
                Property::Unparsed(UnparsedProperty {
                    property_id: unparsed.property_id.clone(),
                    value,
                })
            })
        }
        Property::Custom(custom) => resolve(&custom.value, variables, 0).map(|value| {
            Property::Custom(CustomProperty {
                name: custom.name.clone(),
                value,
            })
        }),
        _ => None,
    }
}

/// Resolve `var()` references in `tokens`; `None` when nothing changed
pub fn resolve<'i>(
    tokens: &TokenList<'i>,
    variables: &Variables<'i>,
    depth: usize,
) -> Option<TokenList<'i>> {
    if depth > MAX_DEPTH {
        return None;
    }

    let mut changed = false;
    let mut resolved = Vec::with_capacity(tokens.0.len());

    for token in &tokens.0 {
        match token {
            TokenOrValue::Var(variable) => {
                let name: &str = &variable.name.ident.0;
                let value = variables
                    .get(name)
                    .map(|value| resolve(value, variables, depth + 1).unwrap_or_else(|| value.clone()))
                    .or_else(|| {
                        variable.fallback.as_ref().map(|fallback| {
                            resolve(fallback, variables, depth + 1)
                                .unwrap_or_else(|| fallback.clone())
                        })
                    });
                match value {
                    Some(value) => {
                        resolved.extend(value.0);
                        changed = true;
                    }
                    None => resolved.push(token.clone()),
                }
            }
            TokenOrValue::Function(function) => {
                match resolve(&function.arguments, variables, depth + 1) {
                    Some(arguments) => {
                        let mut function = function.clone();
                        function.arguments = arguments;
                        resolved.push(TokenOrValue::Function(function));
                        changed = true;
                    }
                    None => resolved.push(token.clone()),
                }
            }
            _ => resolved.push(token.clone()),
        }
    }

    changed.then(|| TokenList(resolved))
}

fn property_has_var(property: &Property<'_>) -> bool {
    match property {
        Property::Unparsed(unparsed) => has_var(&unparsed.value),
        Property::Custom(custom) => has_var(&custom.value),
        _ => false,
    }
}

fn has_var(tokens: &TokenList<'_>) -> bool {
    tokens.0.iter().any(|token| match token {
        TokenOrValue::Var(_) => true,
        TokenOrValue::Function(function) => has_var(&function.arguments),
        _ => false,
    })
}

fn custom_name(name: &CustomPropertyName<'_>) -> String {
    match name {
        CustomPropertyName::Custom(ident) => ident.0.to_string(),
        CustomPropertyName::Unknown(ident) => ident.0.to_string(),
    }
}

fn is_root(selectors: &SelectorList<'_>) -> bool {
    selectors
        .to_css_string(PrinterOptions::default())
        .is_ok_and(|selector| selector.trim() == ":root")
}

fn is_empty_style_rule(rule: &CssRule<'_>) -> bool {
    match rule {
        CssRule::Style(style) => {
            style.declarations.declarations.is_empty()
                && style.declarations.important_declarations.is_empty()
                && style.rules.0.is_empty()
        }
        _ => false,
    }
}
