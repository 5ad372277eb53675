use memchr::memmem;

use crate::module::{Binding, BindingList};

// === Directive === //

pub const DIRECTIVE_PREFIX: &str = "#pragma glslify:";

/// A parsed `#pragma glslify:` directive.
///
/// ```text
/// #pragma glslify: export(<symbol>)
/// #pragma glslify: <alias> = require(<path>[, <formal>=<actual>...])
/// ```
///
/// The prefix may appear anywhere in the preprocessor token. Parsing is lenient in the same places
/// the directive grammar has always been: the export symbol and the `require` argument list each
/// run up to the first `)`, and nothing after that is looked at.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Directive {
    Export {
        symbol: String,
    },
    Import {
        alias: String,
        path: String,
        bindings: BindingList,
    },
    Other,
}

impl Directive {
    pub fn has_prefix(text: &str) -> bool {
        memmem::find(text.as_bytes(), DIRECTIVE_PREFIX.as_bytes()).is_some()
    }

    pub fn parse(text: &str) -> Self {
        if let Some(symbol) = directive_bodies(text).find_map(parse_export) {
            return Self::Export {
                symbol: symbol.trim().to_string(),
            };
        }

        if let Some((alias, args)) = directive_bodies(text).find_map(parse_import) {
            let mut args = args.split(',');
            let path = unquote(args.next().unwrap_or_default().trim()).to_string();
            let bindings = parse_bindings(args);

            return Self::Import {
                alias: alias.to_string(),
                path,
                bindings,
            };
        }

        Self::Other
    }
}

fn directive_bodies(text: &str) -> impl Iterator<Item = &str> + '_ {
    memmem::find_iter(text.as_bytes(), DIRECTIVE_PREFIX.as_bytes())
        .map(move |at| text[at + DIRECTIVE_PREFIX.len()..].trim_start())
}

fn parse_export(body: &str) -> Option<&str> {
    let args = body.strip_prefix("export(")?;
    let end = args.find(')')?;
    (end > 0).then(|| &args[..end])
}

fn parse_import(body: &str) -> Option<(&str, &str)> {
    let alias_len = body
        .find(|c: char| c == '=' || c.is_whitespace())
        .unwrap_or(body.len());

    if alias_len == 0 {
        return None;
    }

    let (alias, rest) = body.split_at(alias_len);
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let args = rest.strip_prefix("require(")?;
    let end = args.find(')')?;

    (end > 0).then(|| (alias, &args[..end]))
}

fn unquote(path: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = path
            .strip_prefix(quote)
            .and_then(|path| path.strip_suffix(quote))
        {
            return inner;
        }
    }

    path
}

/// Parses `formal=actual` entries. In a chained entry such as `a=b=c`, every name before the last
/// `=` is bound to the last expression. Entries without any `=` bind nothing and are dropped.
fn parse_bindings<'a>(entries: impl Iterator<Item = &'a str>) -> BindingList {
    let mut bindings = BindingList::new();

    for entry in entries {
        let mut parts = entry.split('=').map(str::trim).collect::<Vec<_>>();

        let Some(actual) = parts.pop() else {
            continue;
        };

        if actual.is_empty() || parts.is_empty() {
            continue;
        }

        for formal in parts.into_iter().filter(|formal| !formal.is_empty()) {
            bindings.push(Binding::new(formal, actual));
        }
    }

    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(alias: &str, path: &str, bindings: &[(&str, &str)]) -> Directive {
        Directive::Import {
            alias: alias.to_string(),
            path: path.to_string(),
            bindings: bindings
                .iter()
                .map(|&(formal, actual)| Binding::new(formal, actual))
                .collect(),
        }
    }

    #[test]
    fn parses_exports() {
        assert_eq!(
            Directive::parse("#pragma glslify: export(foo)"),
            Directive::Export {
                symbol: "foo".to_string()
            }
        );
        assert_eq!(
            Directive::parse("#pragma glslify:export( noise )  // trailing"),
            Directive::Export {
                symbol: "noise".to_string()
            }
        );
    }

    #[test]
    fn parses_imports() {
        assert_eq!(
            Directive::parse("#pragma glslify: foo = require('./b')"),
            import("foo", "./b", &[])
        );
        assert_eq!(
            Directive::parse(r#"#pragma glslify: noise=require("glsl-noise/simplex/3d")"#),
            import("noise", "glsl-noise/simplex/3d", &[])
        );
        assert_eq!(
            Directive::parse("#pragma glslify: f = require(./x, a = b, c=d=e, g)"),
            import("f", "./x", &[("a", "b"), ("c", "e"), ("d", "e")])
        );
    }

    #[test]
    fn drops_bare_binding_entries() {
        assert_eq!(
            Directive::parse("#pragma glslify: f = require(./x, f)"),
            import("f", "./x", &[])
        );
        assert_eq!(
            Directive::parse("#pragma glslify: f = require(./x, g, =h, a=b)"),
            import("f", "./x", &[("a", "b")])
        );
    }

    #[test]
    fn rejects_malformed_directives() {
        assert_eq!(Directive::parse("#pragma glslify: export()"), Directive::Other);
        assert_eq!(Directive::parse("#pragma glslify: foo = require()"), Directive::Other);
        assert_eq!(Directive::parse("#pragma glslify: = require(./b)"), Directive::Other);
        assert_eq!(Directive::parse("#pragma glslify: foo require(./b)"), Directive::Other);
        assert_eq!(Directive::parse("#pragma once"), Directive::Other);

        assert!(Directive::has_prefix("#pragma glslify: whatever"));
        assert!(!Directive::has_prefix("#pragma once"));
    }

    #[test]
    fn strips_one_layer_of_matching_quotes() {
        assert_eq!(unquote("'a'"), "a");
        assert_eq!(unquote("\"'a'\""), "'a'");
        assert_eq!(unquote("'a\""), "'a\"");
        assert_eq!(unquote("a"), "a");
    }
}
