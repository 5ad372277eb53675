use std::sync::OnceLock;

use link_utils::hash::FxHashSet;

// === Word Lists === //

#[rustfmt::skip]
pub const KEYWORDS: &[&str] = &[
    // Qualifiers
    "attribute", "const", "uniform", "varying", "buffer", "shared", "coherent", "volatile",
    "restrict", "readonly", "writeonly", "layout", "centroid", "flat", "smooth",
    "noperspective", "patch", "sample", "invariant", "precise", "in", "out", "inout",
    "precision", "highp", "mediump", "lowp", "subroutine",
    // Control flow
    "break", "continue", "do", "for", "while", "switch", "case", "default", "if", "else",
    "discard", "return",
    // Literals
    "true", "false",
    // Scalar and vector types
    "void", "bool", "int", "uint", "float", "double", "vec2", "vec3", "vec4", "ivec2", "ivec3",
    "ivec4", "bvec2", "bvec3", "bvec4", "uvec2", "uvec3", "uvec4", "dvec2", "dvec3", "dvec4",
    // Matrix types
    "mat2", "mat3", "mat4", "mat2x2", "mat2x3", "mat2x4", "mat3x2", "mat3x3", "mat3x4",
    "mat4x2", "mat4x3", "mat4x4", "dmat2", "dmat3", "dmat4", "dmat2x2", "dmat2x3", "dmat2x4",
    "dmat3x2", "dmat3x3", "dmat3x4", "dmat4x2", "dmat4x3", "dmat4x4",
    // Opaque types
    "sampler1D", "sampler2D", "sampler3D", "samplerCube", "sampler1DShadow", "sampler2DShadow",
    "samplerCubeShadow", "sampler1DArray", "sampler2DArray", "sampler1DArrayShadow",
    "sampler2DArrayShadow", "samplerCubeArray", "samplerCubeArrayShadow", "sampler2DRect",
    "sampler2DRectShadow", "samplerBuffer", "sampler2DMS", "sampler2DMSArray",
    "samplerExternalOES", "isampler1D", "isampler2D", "isampler3D", "isamplerCube",
    "isampler1DArray", "isampler2DArray", "isamplerCubeArray", "isampler2DRect",
    "isamplerBuffer", "isampler2DMS", "isampler2DMSArray", "usampler1D", "usampler2D",
    "usampler3D", "usamplerCube", "usampler1DArray", "usampler2DArray", "usamplerCubeArray",
    "usampler2DRect", "usamplerBuffer", "usampler2DMS", "usampler2DMSArray", "image1D",
    "image2D", "image3D", "imageCube", "image2DArray", "iimage2D", "iimage3D", "uimage2D",
    "uimage3D", "atomic_uint",
    // Structure
    "struct",
    // Reserved for future use
    "asm", "class", "union", "enum", "typedef", "template", "this", "packed", "resource",
    "goto", "inline", "noinline", "public", "static", "extern", "external", "interface",
    "long", "short", "half", "fixed", "unsigned", "superp", "input", "output", "hvec2",
    "hvec3", "hvec4", "fvec2", "fvec3", "fvec4", "sampler3DRect", "filter", "sizeof", "cast",
    "namespace", "using",
];

#[rustfmt::skip]
pub const BUILTINS: &[&str] = &[
    // Angle and trigonometry
    "radians", "degrees", "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh",
    "asinh", "acosh", "atanh",
    // Exponential
    "pow", "exp", "log", "exp2", "log2", "sqrt", "inversesqrt",
    // Common
    "abs", "sign", "floor", "trunc", "round", "roundEven", "ceil", "fract", "mod", "modf",
    "min", "max", "clamp", "mix", "step", "smoothstep", "isnan", "isinf", "fma", "frexp",
    "ldexp", "floatBitsToInt", "floatBitsToUint", "intBitsToFloat", "uintBitsToFloat",
    // Packing
    "packSnorm2x16", "unpackSnorm2x16", "packUnorm2x16", "unpackUnorm2x16", "packHalf2x16",
    "unpackHalf2x16", "packUnorm4x8", "unpackUnorm4x8", "packSnorm4x8", "unpackSnorm4x8",
    // Geometric
    "length", "distance", "dot", "cross", "normalize", "faceforward", "reflect", "refract",
    // Matrix
    "matrixCompMult", "outerProduct", "transpose", "determinant", "inverse",
    // Vector relational
    "lessThan", "lessThanEqual", "greaterThan", "greaterThanEqual", "equal", "notEqual", "any",
    "all", "not",
    // Integer
    "bitfieldExtract", "bitfieldInsert", "bitfieldReverse", "bitCount", "findLSB", "findMSB",
    // Texture lookup
    "texture", "textureSize", "textureProj", "textureLod", "textureOffset", "texelFetch",
    "texelFetchOffset", "textureProjOffset", "textureLodOffset", "textureProjLod",
    "textureProjLodOffset", "textureGrad", "textureGradOffset", "textureProjGrad",
    "textureProjGradOffset", "textureGather", "textureGatherOffset", "texture2D",
    "texture2DProj", "texture2DLod", "texture2DProjLod", "textureCube", "textureCubeLod",
    "texture2DLodEXT", "texture2DProjLodEXT", "textureCubeLodEXT", "texture2DGradEXT",
    "texture2DProjGradEXT", "textureCubeGradEXT",
    // Derivatives
    "dFdx", "dFdy", "fwidth",
];

/// Operators ordered so that longer spellings are tried first.
#[rustfmt::skip]
pub const OPERATORS: &[&str] = &[
    "<<=", ">>=", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "^^", "+=", "-=",
    "*=", "/=", "%=", "&=", "^=", "|=", "(", ")", "[", "]", "{", "}", ".", ",", ";", ":", "+",
    "-", "*", "/", "%", "<", ">", "!", "~", "&", "|", "^", "?", "=",
];

// === Lookups === //

fn keyword_set() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| KEYWORDS.iter().copied().collect())
}

fn builtin_set() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| BUILTINS.iter().copied().collect())
}

pub fn is_keyword(word: &str) -> bool {
    keyword_set().contains(word)
}

pub fn is_builtin(word: &str) -> bool {
    word.starts_with("gl_") || builtin_set().contains(word)
}

/// Whether a keyword names a type, meaning that an identifier directly after it is being declared.
pub fn is_type_keyword(word: &str) -> bool {
    const TYPE_PREFIXES: &[&str] = &[
        "vec", "bvec", "ivec", "uvec", "dvec", "mat", "dmat", "sampler", "isampler", "usampler",
        "image", "iimage", "uimage",
    ];

    matches!(
        word,
        "void" | "bool" | "int" | "uint" | "float" | "double" | "atomic_uint"
    ) || (is_keyword(word) && TYPE_PREFIXES.iter().any(|prefix| word.starts_with(prefix)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_words() {
        assert!(is_keyword("uniform"));
        assert!(is_keyword("samplerCube"));
        assert!(!is_keyword("texture2D"));

        assert!(is_builtin("texture2D"));
        assert!(is_builtin("gl_FragColor"));
        assert!(!is_builtin("glsl"));

        assert!(is_type_keyword("vec3"));
        assert!(is_type_keyword("mat4x3"));
        assert!(is_type_keyword("sampler2D"));
        assert!(!is_type_keyword("return"));
        assert!(!is_type_keyword("vector"));
    }

    #[test]
    fn operators_prefer_longest_match() {
        for (i, op) in OPERATORS.iter().enumerate() {
            for shorter in &OPERATORS[..i] {
                assert!(
                    !op.starts_with(shorter) || shorter.len() >= op.len(),
                    "{shorter:?} shadows {op:?}"
                );
            }
        }
    }
}
