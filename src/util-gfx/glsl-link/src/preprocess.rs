use glsl_tokens::{annotate, tokenize, TokenKind};

use crate::{
    directive::Directive,
    error::BundleError,
    graph::{ModuleGraph, ModuleIndex},
    module::{ImportDirective, ParsedModule},
};

/// The symbol an entry module exports when it has no export directive.
pub const DEFAULT_ENTRY_EXPORT: &str = "main";

/// Tokenizes a module and pulls its directives out of the token stream.
///
/// Import targets are looked up through the module's `deps`, which [`ModuleGraph::new`] has
/// already checked against the set of known modules.
pub fn preprocess(graph: &ModuleGraph, idx: ModuleIndex) -> Result<ParsedModule, BundleError> {
    let module = graph.module(idx);

    let mut tokens = tokenize(&module.source);
    annotate(&mut tokens);

    let mut kept = Vec::with_capacity(tokens.len());
    let mut imports = Vec::new();
    let mut export = None;

    for token in tokens {
        if token.kind != TokenKind::Preprocessor || !Directive::has_prefix(&token.data) {
            kept.push(token);
            continue;
        }

        match Directive::parse(&token.data) {
            Directive::Export { symbol } => {
                export = Some(symbol);
            }
            Directive::Import {
                alias,
                path,
                bindings,
            } => {
                let span = token.offset..token.end_offset();
                let target = module
                    .deps
                    .get(&path)
                    .and_then(|target| graph.lookup(target));

                let Some(target) = target else {
                    return Err(BundleError::UnresolvedImport {
                        module: module.id.clone(),
                        file: module.file.clone(),
                        path,
                        span,
                    });
                };

                imports.push(ImportDirective {
                    alias,
                    path,
                    target,
                    bindings,
                    position: kept.len(),
                    span,
                });
            }
            Directive::Other => {
                log::warn!(
                    "{}:{}: ignoring malformed directive {:?}",
                    module.file,
                    token.line,
                    token.data.trim(),
                );
                kept.push(token);
            }
        }
    }

    if kept.last().is_some_and(|token| token.kind == TokenKind::Eof) {
        kept.pop();
    }

    let export = match export {
        Some(export) => export,
        None if module.entry => DEFAULT_ENTRY_EXPORT.to_string(),
        None => {
            return Err(BundleError::MissingExport {
                module: module.id.clone(),
                file: module.file.clone(),
            })
        }
    };

    log::debug!(
        "preprocessed {} ({} imports, exports `{export}`)",
        module.file,
        imports.len(),
    );

    Ok(ParsedModule {
        tokens: kept,
        imports,
        export,
    })
}

#[cfg(test)]
mod tests {
    use glsl_tokens::stringify;

    use super::*;
    use crate::module::{Binding, Module};

    fn preprocess_one(modules: Vec<Module>, id: &str) -> Result<ParsedModule, BundleError> {
        let graph = ModuleGraph::new(modules).unwrap();
        preprocess(&graph, graph.lookup(id).unwrap())
    }

    #[test]
    fn strips_directives() {
        let parsed = preprocess_one(
            vec![
                Module::new(
                    "a",
                    "#pragma glslify: foo = require('./b', x = y)\nfloat main(){ return foo(1.0); }",
                )
                .with_dep("./b", "b")
                .as_entry(),
                Module::new("b", "#pragma glslify: export(foo)\nfloat foo(float x){ return x; }"),
            ],
            "a",
        )
        .unwrap();

        assert_eq!(parsed.export, "main");
        assert_eq!(stringify(&parsed.tokens), "\nfloat main(){ return foo(1.0); }");
        assert_eq!(parsed.tokens.last().map(|t| t.kind), Some(TokenKind::Operator));

        let [import] = parsed.imports.as_slice() else {
            panic!("expected one import, got {:?}", parsed.imports);
        };

        assert_eq!(import.alias, "foo");
        assert_eq!(import.path, "./b");
        assert_eq!(import.position, 0);
        assert_eq!(import.span, 0..44);
        assert_eq!(import.bindings.as_slice(), [Binding::new("x", "y")]);
    }

    #[test]
    fn records_export_and_splice_points() {
        let parsed = preprocess_one(
            vec![
                Module::new(
                    "b",
                    "float a;\n#pragma glslify: c = require(./c)\n#pragma glslify: export(b)\n",
                )
                .with_dep("./c", "c"),
                Module::new("c", "#pragma glslify: export(c)"),
            ],
            "b",
        )
        .unwrap();

        assert_eq!(parsed.export, "b");
        assert_eq!(parsed.imports[0].position, 5);
        assert_eq!(stringify(&parsed.tokens), "float a;\n\n\n");
    }

    #[test]
    fn keeps_malformed_directives() {
        let parsed = preprocess_one(
            vec![Module::new("a", "#pragma glslify: nonsense\nvoid main() {}").as_entry()],
            "a",
        )
        .unwrap();

        assert!(stringify(&parsed.tokens).starts_with("#pragma glslify: nonsense\n"));
        assert!(parsed.imports.is_empty());
    }

    #[test]
    fn missing_exports_and_unresolved_imports() {
        assert_eq!(
            preprocess_one(vec![Module::new("b", "float foo;").with_file("b.glsl")], "b")
                .unwrap_err(),
            BundleError::MissingExport {
                module: "b".to_string(),
                file: "b.glsl".to_string(),
            }
        );

        assert_eq!(
            preprocess_one(
                vec![Module::new("a", "void main() {}\n#pragma glslify: x = require(./nope)")
                    .as_entry()],
                "a",
            )
            .unwrap_err(),
            BundleError::UnresolvedImport {
                module: "a".to_string(),
                file: "a".to_string(),
                path: "./nope".to_string(),
                span: 15..51,
            }
        );
    }
}
