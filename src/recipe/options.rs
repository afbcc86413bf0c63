// src/recipe/options.rs

//! Option model: which recipe-declared options an invocation enables
//!
//! Invocation arguments are passed in explicitly; nothing here reads the
//! process environment. Flags the recipe does not declare are ignored,
//! since a formula may receive flags meant for the host package manager.

use crate::recipe::format::{BuildOption, Variant};
use std::collections::BTreeSet;

/// Names of the options enabled by `raw_args` for the active variant
///
/// An option is enabled iff its flag literal (`--<name>`) appears in
/// `raw_args` and the option is offered for `variant`. Repeats are harmless.
pub fn parse_options(
    declared: &[BuildOption],
    raw_args: &[String],
    variant: Variant,
) -> BTreeSet<String> {
    declared
        .iter()
        .filter(|option| option.applies_to(variant))
        .filter(|option| {
            let literal = option.flag_literal();
            raw_args.iter().any(|arg| *arg == literal)
        })
        .map(|option| option.name.clone())
        .collect()
}

/// Options offered for a variant, in declaration order
pub fn offered_options(declared: &[BuildOption], variant: Variant) -> Vec<&BuildOption> {
    declared.iter().filter(|o| o.applies_to(variant)).collect()
}
