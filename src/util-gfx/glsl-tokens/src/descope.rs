use link_utils::hash::{FxHashMap, FxHashSet};

use crate::{
    preprocessor::PpLine,
    token::{IdentScope, Token, TokenKind},
};

/// Renames every module-scoped identifier in `tokens` to `name_for(name)`.
///
/// `name_for` is called at most once per distinct name. Macro names are part of the module's
/// namespace too: the name of every `#define` and `#undef` is renamed, as is the name tested by
/// `#ifdef` and `#ifndef` when the same token list defines it. Expects [`annotate`] to have run.
///
/// [`annotate`]: crate::scope::annotate
pub fn descope(tokens: &mut [Token], mut name_for: impl FnMut(&str) -> String) {
    let mut cache = FxHashMap::<String, String>::default();
    let mut rename = |name: &str| -> String {
        if let Some(renamed) = cache.get(name) {
            return renamed.clone();
        }

        let renamed = name_for(name);
        cache.insert(name.to_string(), renamed.clone());
        renamed
    };

    let defined_macros = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Preprocessor)
        .filter_map(|token| {
            let line = PpLine::parse(&token.data)?;
            if !line.is_macro_definition() {
                return None;
            }

            line.name_in(&token.data).map(str::to_string)
        })
        .collect::<FxHashSet<_>>();

    for token in tokens {
        match token.kind {
            TokenKind::Ident if token.scope == IdentScope::Module => {
                token.data = rename(&token.data);
            }
            TokenKind::Preprocessor => {
                let Some(line) = PpLine::parse(&token.data) else {
                    continue;
                };

                let Some(range) = line.name.clone() else {
                    continue;
                };

                let name = &token.data[range.clone()];
                let applies = line.is_macro_definition()
                    || (line.is_macro_query() && defined_macros.contains(name));

                if applies {
                    let renamed = rename(name);
                    token.data.replace_range(range, &renamed);
                }
            }
            _ => {}
        }
    }
}
