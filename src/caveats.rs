// src/caveats.rs

//! Post-install guidance text

use crate::recipe::{InstallLayout, Recipe};

/// Resolve the recipe's caveats against the layout
///
/// Returns `None` when the recipe has no caveats or they are blank.
pub fn render_caveats(recipe: &Recipe, layout: &InstallLayout) -> Option<String> {
    let caveats = recipe.caveats.as_ref()?;
    let text = recipe.substitute(caveats.text.trim(), layout);
    if text.is_empty() {
        return None;
    }
    Some(format!("{}\n", text))
}
