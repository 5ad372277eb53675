use std::iter;

use glsl_tokens::{inject_defines, stringify, trim_whitespace};
use link_utils::newtypes::IndexVec;

use crate::{
    error::BundleError,
    graph::{ModuleGraph, ModuleIndex},
    module::{Module, ParsedModule},
    preprocess::preprocess,
    resolve::Resolver,
};

// === Bundle === //

/// Defined in every bundle so shaders can tell they were bundled.
pub const TOOL_DEFINE: (&str, &str) = ("GLSLIFY", "1");

#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Whether to tidy the whitespace left behind by stripped directives and stitched modules.
    pub trim: bool,

    /// Extra defines, emitted in order after the tool's own define.
    pub defines: Vec<(String, String)>,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            trim: true,
            defines: Vec::new(),
        }
    }
}

/// Bundles `modules` into a single source text containing every entry module and, once per
/// distinct binding list, every module they transitively import.
pub fn bundle(
    modules: impl IntoIterator<Item = Module>,
    options: &BundleOptions,
) -> Result<String, BundleError> {
    let graph = ModuleGraph::new(modules)?;
    let order = graph.toposort()?;

    let mut parsed = IndexVec::<ModuleIndex, ParsedModule>::new();
    for (idx, _) in graph.modules() {
        parsed.push(preprocess(&graph, idx)?);
    }

    let mut resolver = Resolver::new(&graph, &parsed);
    let mut tokens = Vec::new();

    for idx in order {
        if !graph.module(idx).entry {
            continue;
        }

        log::debug!("resolving entry {}", graph.module(idx).file);
        tokens.extend(resolver.resolve(idx, &[]).tokens);
    }

    if options.trim {
        tokens = trim_whitespace(tokens);
    }

    let source = stringify(&tokens);
    let defines = iter::once(TOOL_DEFINE).chain(
        options
            .defines
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );

    log::debug!("bundled {} module(s) into {} bytes", graph.len(), source.len());

    Ok(inject_defines(&source, defines))
}

#[cfg(test)]
mod tests {
    use link_utils::hash::murmur3_str;

    use super::*;
    use crate::module::Binding;

    fn scenario() -> Vec<Module> {
        vec![
            Module::new(
                "a",
                "#pragma glslify: foo = require('./b')\nfloat main(){ return foo(1.0); }",
            )
            .with_dep("./b", "b")
            .as_entry(),
            Module::new("b", "#pragma glslify: export(foo)\nfloat foo(float x){ return x*2.0; }"),
        ]
    }

    #[test]
    fn bundles_the_basic_scenario() {
        let out = bundle(scenario(), &BundleOptions::default()).unwrap();

        assert_eq!(
            out,
            "#define GLSLIFY 1\n\
             float foo_808595181(float x){ return x*2.0; }\n\
             float main(){ return foo_808595181(1.0); }"
        );
        assert!(!out.contains("#pragma"));
    }

    #[test]
    fn bundling_is_deterministic() {
        let options = BundleOptions::default();
        assert_eq!(
            bundle(scenario(), &options).unwrap(),
            bundle(scenario(), &options).unwrap()
        );
    }

    #[test]
    fn untrimmed_output_and_extra_defines() {
        let options = BundleOptions {
            trim: false,
            defines: vec![
                ("PI".to_string(), "3.14159".to_string()),
                ("FAST".to_string(), String::new()),
            ],
        };

        let out = bundle(scenario(), &options).unwrap();
        assert_eq!(
            out,
            "#define GLSLIFY 1\n#define PI 3.14159\n#define FAST\n\
             \nfloat foo_808595181(float x){ return x*2.0; }\n\
             float main(){ return foo_808595181(1.0); }"
        );
    }

    #[test]
    fn shared_instantiations_are_emitted_once() {
        let out = bundle(
            vec![
                Module::new(
                    "main",
                    "#pragma glslify: a = require(./a)\n\
                     #pragma glslify: b = require(./b)\n\
                     void main() { a(); b(); }",
                )
                .with_dep("./a", "a")
                .with_dep("./b", "b")
                .as_entry(),
                Module::new(
                    "a",
                    "#pragma glslify: s = require(./shared)\nvoid a() { s(); }\n#pragma glslify: export(a)",
                )
                .with_dep("./shared", "shared"),
                Module::new(
                    "b",
                    "#pragma glslify: s = require(./shared)\nvoid b() { s(); }\n#pragma glslify: export(b)",
                )
                .with_dep("./shared", "shared"),
                Module::new("shared", "void s() {}\n#pragma glslify: export(s)"),
            ],
            &BundleOptions::default(),
        )
        .unwrap();

        let shared = format!("s_{}", murmur3_str(":shared"));
        assert_eq!(out.matches(&format!("void {shared}()")).count(), 1);
        assert_eq!(out.matches(&format!("{shared}();")).count(), 2);
    }

    #[test]
    fn different_bindings_are_emitted_separately() {
        let out = bundle(
            vec![
                Module::new(
                    "main",
                    "#pragma glslify: ramp1 = require(./ramp, f = one)\n\
                     #pragma glslify: ramp2 = require(./ramp, f = two)\n\
                     float one(float x) { return x; }\n\
                     float two(float x) { return x * x; }\n\
                     void main() { ramp1(0.0) + ramp2(1.0); }",
                )
                .with_dep("./ramp", "ramp")
                .as_entry(),
                Module::new(
                    "ramp",
                    "float ramp(float x) { return f(x); }\n#pragma glslify: export(ramp)",
                ),
            ],
            &BundleOptions::default(),
        )
        .unwrap();

        let one = format!("ramp_{}", murmur3_str("f,one:ramp"));
        let two = format!("ramp_{}", murmur3_str("f,two:ramp"));
        assert_ne!(one, two);

        assert!(out.contains(&format!("float {one}(float x) {{ return one(x); }}")));
        assert!(out.contains(&format!("float {two}(float x) {{ return two(x); }}")));
        assert!(out.contains(&format!("void main() {{ {one}(0.0) + {two}(1.0); }}")));
    }

    #[test]
    fn bare_binding_entries_share_the_plain_instantiation() {
        let out = bundle(
            vec![
                Module::new(
                    "main",
                    "#pragma glslify: p = require(./x)\n\
                     #pragma glslify: q = require(./x, f)\n\
                     float main() { return p() + q(); }",
                )
                .with_dep("./x", "x")
                .as_entry(),
                Module::new(
                    "x",
                    "float f() { return 1.0; }\n\
                     float x() { return f(); }\n\
                     #pragma glslify: export(x)",
                ),
            ],
            &BundleOptions::default(),
        )
        .unwrap();

        let suffix = murmur3_str(":x");
        assert_eq!(out.matches(&format!("float f_{suffix}()")).count(), 1);
        assert_eq!(out.matches(&format!("float x_{suffix}()")).count(), 1);
        assert!(!out.contains("float f()"));
        assert!(out.contains(&format!("return x_{suffix}() + x_{suffix}();")));
    }

    #[test]
    fn sibling_helpers_stay_apart() {
        let out = bundle(
            vec![
                Module::new(
                    "main",
                    "#pragma glslify: one = require(./one)\n\
                     #pragma glslify: two = require(./two)\n\
                     float main() { return one() + two(); }",
                )
                .with_dep("./one", "one")
                .with_dep("./two", "two")
                .as_entry(),
                Module::new(
                    "one",
                    "float helper() { return 1.0; }\n\
                     float one() { float v = helper(); return v; }\n\
                     #pragma glslify: export(one)",
                ),
                Module::new(
                    "two",
                    "float helper() { return 2.0; }\n\
                     float two() { float v = helper(); return v; }\n\
                     #pragma glslify: export(two)",
                ),
            ],
            &BundleOptions::default(),
        )
        .unwrap();

        let one = murmur3_str(":one");
        let two = murmur3_str(":two");
        assert_ne!(one, two);

        assert!(out.contains(&format!("float helper_{one}() {{ return 1.0; }}")));
        assert!(out.contains(&format!("float helper_{two}() {{ return 2.0; }}")));
        assert!(out.contains(&format!("float one_{one}() {{ float v = helper_{one}(); return v; }}")));
        assert!(out.contains(&format!("float two_{two}() {{ float v = helper_{two}(); return v; }}")));
        assert!(!out.contains("float helper()"));
    }

    #[test]
    fn interface_block_members_are_not_renamed() {
        let out = bundle(
            vec![
                Module::new(
                    "main",
                    "#pragma glslify: t = require(./t)\nvec4 main() { return t(); }",
                )
                .with_dep("./t", "t")
                .as_entry(),
                Module::new(
                    "t",
                    "uniform Params { vec4 tint; };\n\
                     vec4 t() { return tint; }\n\
                     #pragma glslify: export(t)",
                ),
            ],
            &BundleOptions::default(),
        )
        .unwrap();

        let suffix = murmur3_str(":t");
        assert!(out.contains("uniform Params { vec4 tint; };"));
        assert!(out.contains(&format!("vec4 t_{suffix}() {{ return tint; }}")));
    }

    #[test]
    fn malformed_directives_are_kept() {
        let out = bundle(
            [Module::new(
                "main",
                "#pragma glslify: foo require(./b)\nvoid main() {}",
            )
            .as_entry()],
            &BundleOptions::default(),
        )
        .unwrap();

        assert!(out.contains("#pragma glslify: foo require(./b)\n"));
        assert!(out.ends_with("void main() {}"));
    }

    #[test]
    fn binding_order_does_not_matter() {
        let mut rng = fastrand::Rng::with_seed(0x6c73_6c67);
        let mut bindings = (0..8)
            .map(|i| Binding::new(format!("f{i}"), format!("g{i}")))
            .collect::<Vec<_>>();

        let render = |bindings: &[Binding]| {
            let list = bindings
                .iter()
                .map(|binding| format!("{}={}", binding.formal, binding.actual))
                .collect::<Vec<_>>()
                .join(", ");

            bundle(
                vec![
                    Module::new("main", format!("#pragma glslify: x = require(./x, {list})\n"))
                        .with_dep("./x", "x")
                        .as_entry(),
                    Module::new("x", "float x;\n#pragma glslify: export(x)"),
                ],
                &BundleOptions::default(),
            )
            .unwrap()
        };

        let expected = render(&bindings);
        for _ in 0..16 {
            rng.shuffle(&mut bindings);
            assert_eq!(render(&bindings), expected);
        }
    }

    #[test]
    fn entry_modules_default_to_main() {
        let out = bundle(
            [Module::new("a", "void main() {}").as_entry()],
            &BundleOptions::default(),
        )
        .unwrap();

        assert_eq!(out, "#define GLSLIFY 1\nvoid main() {}");
    }

    #[test]
    fn surfaces_errors() {
        let options = BundleOptions::default();

        assert!(matches!(
            bundle([Module::new("a", "void f() {}")], &options),
            Err(BundleError::MissingExport { .. })
        ));
        assert!(matches!(
            bundle(
                [Module::new("a", "#pragma glslify: b = require(./b)").as_entry()],
                &options
            ),
            Err(BundleError::UnresolvedImport { .. })
        ));
        assert!(matches!(
            bundle([Module::new("a", "").as_entry().with_dep("./b", "b")], &options),
            Err(BundleError::UnknownModule { .. })
        ));
        assert!(matches!(
            bundle([Module::new("a", ""), Module::new("a", "")], &options),
            Err(BundleError::DuplicateModule { .. })
        ));
        assert!(matches!(
            bundle(
                [
                    Module::new("a", "#pragma glslify: export(a)").with_dep("./b", "b"),
                    Module::new("b", "#pragma glslify: export(b)").with_dep("./a", "a"),
                ],
                &options
            ),
            Err(BundleError::CyclicDependency { .. })
        ));
    }
}
