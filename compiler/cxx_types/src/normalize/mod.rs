//! Canonical spelling of C++ type names.
//!
//! Two spellings of one type must map to one registry key. The normalizer
//! folds multi-word builtin synonyms (`long unsigned int` is `unsigned long`)
//! and drops trailing template arguments that repeat the template's declared
//! default (`vector<int,std::allocator<int> >` is `vector<int>`).
//!
//! # Design
//!
//! - The default-argument table is owned by a [`Normalizer`] value, not a
//!   global, so callers can register their own templates
//! - Argument splitting counts `<`/`(` against `>`/`)` so commas inside
//!   nested instantiations never split
//! - Elision walks from the last argument backwards and stops at the first
//!   argument that is not its default

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::qualname;

/// Multi-word builtin spellings and their canonical forms, applied in order.
const BUILTIN_SYNONYMS: &[(&str, &str)] = &[
    ("long long unsigned int", "unsigned long long"),
    ("long long int", "long long"),
    ("unsigned short int", "unsigned short"),
    ("short unsigned int", "unsigned short"),
    ("short int", "short"),
    ("long unsigned int", "unsigned long"),
    ("unsigned long int", "unsigned long"),
    ("long int", "long"),
];

const COMPLEX_SYNONYMS: &[(&str, &str)] = &[
    ("complex float", "float complex"),
    ("complex double", "double complex"),
    ("complex long double", "long double complex"),
];

#[allow(clippy::expect_used, reason = "literal patterns are known to compile")]
static BARE_UNSIGNED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(unsigned)(\s+)?([^\w\s])").expect("valid regex"));

#[allow(clippy::expect_used, reason = "literal patterns are known to compile")]
static INTEGER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)ul?\b").expect("valid regex"));

#[allow(clippy::expect_used, reason = "literal patterns are known to compile")]
static PADDED_NEGATIVE_HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-0x0*([1-9A-Fa-f][0-9A-Fa-f]*)\b").expect("valid regex")
});

/// Matcher for one template parameter's default argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultArg {
    /// The parameter has no default; its argument is never elided.
    Required,
    /// Matches an argument equal to the template name or any instantiation
    /// of it: `Prefix("std::less")` matches `std::less<int>`.
    Prefix(String),
}

impl DefaultArg {
    pub fn prefix(name: impl Into<String>) -> Self {
        DefaultArg::Prefix(name.into())
    }

    pub fn matches(&self, arg: &str) -> bool {
        match self {
            DefaultArg::Required => false,
            DefaultArg::Prefix(prefix) => arg
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('<')),
        }
    }
}

/// Type-name canonicalizer.
#[derive(Clone, Debug)]
pub struct Normalizer {
    /// Unqualified template name -> matcher per template parameter.
    defaults: FxHashMap<String, Vec<DefaultArg>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// A normalizer pre-seeded with the standard containers' defaults.
    pub fn new() -> Self {
        let mut n = Self::empty();
        let req = || DefaultArg::Required;
        let pre = DefaultArg::prefix;

        for seq in ["vector", "list", "deque"] {
            n.register_template_defaults(seq, vec![req(), pre("std::allocator")]);
        }
        for set in ["set", "multiset"] {
            n.register_template_defaults(
                set,
                vec![req(), pre("std::less"), pre("std::allocator")],
            );
        }
        for map in ["map", "multimap"] {
            n.register_template_defaults(
                map,
                vec![req(), req(), pre("std::less"), pre("std::allocator")],
            );
        }
        for adaptor in ["queue", "stack"] {
            n.register_template_defaults(adaptor, vec![req(), pre("std::deque")]);
        }
        n.register_template_defaults(
            "basic_string",
            vec![req(), pre("std::char_traits"), pre("std::allocator")],
        );
        for set in ["hash_set", "hash_multiset"] {
            n.register_template_defaults(
                set,
                vec![
                    req(),
                    pre("__gnu_cxx::hash"),
                    pre("std::equal_to"),
                    pre("std::allocator"),
                ],
            );
        }
        for map in ["hash_map", "hash_multimap"] {
            n.register_template_defaults(
                map,
                vec![
                    req(),
                    req(),
                    pre("__gnu_cxx::hash"),
                    pre("std::equal_to"),
                    pre("std::allocator"),
                ],
            );
        }
        n
    }

    /// A normalizer that knows no template defaults.
    pub fn empty() -> Self {
        Normalizer {
            defaults: FxHashMap::default(),
        }
    }

    /// Register (or replace) the default-argument matchers of a template.
    ///
    /// `template` is the unqualified template name as it appears before `<`.
    pub fn register_template_defaults(&mut self, template: &str, params: Vec<DefaultArg>) {
        self.defaults.insert(template.to_string(), params);
    }

    pub fn template_defaults(&self, template: &str) -> Option<&[DefaultArg]> {
        self.defaults.get(template).map(Vec::as_slice)
    }

    /// Canonical spelling of a single name component.
    ///
    /// With `keep_all_template_args` set, default template arguments are
    /// kept; builtin synonyms are folded either way.
    pub fn normalize(&self, raw: &str, keep_all_template_args: bool) -> String {
        let name = raw.trim();
        let Some(open) = template_open(name) else {
            return fold_builtin_synonyms(name);
        };
        let template = &name[..open];
        let suffix = match name.rfind('>') {
            Some(close) if close > open => &name[close + 1..],
            _ => "",
        };

        let mut args: Vec<String> = template_args(name)
            .into_iter()
            .map(|arg| self.normalize_class(arg, keep_all_template_args))
            .collect();

        if !keep_all_template_args {
            if let Some(params) = self.defaults.get(template) {
                while let Some(pos) = args.len().checked_sub(1) {
                    match params.get(pos) {
                        Some(param) if param.matches(&args[pos]) => {
                            args.pop();
                        }
                        _ => break,
                    }
                }
            }
        }

        let mut out = format!("{template}<{}", args.join(","));
        if out.ends_with('>') {
            out.push_str(" >");
        } else {
            out.push('>');
        }
        out.push_str(suffix);
        out
    }

    /// [`normalize`](Self::normalize) applied to every component of a
    /// scoped name, keeping the enclosing qualification.
    pub fn normalize_class(&self, scoped: &str, keep_all_template_args: bool) -> String {
        qualname::split_scoped(scoped)
            .into_iter()
            .map(|part| self.normalize(part, keep_all_template_args))
            .collect::<Vec<_>>()
            .join("::")
    }
}

fn fold_builtin_synonyms(name: &str) -> String {
    let mut out = name.to_string();
    if out.contains("int") {
        for (from, to) in BUILTIN_SYNONYMS {
            if out.contains(from) {
                out = out.replace(from, to);
            }
        }
    }
    if out.contains("complex") {
        for (from, to) in COMPLEX_SYNONYMS {
            if out.contains(from) {
                out = out.replace(from, to);
            }
        }
    }
    out
}

/// Split a template argument list on its top-level commas.
///
/// Each argument is trimmed. An empty or blank list has no arguments.
pub fn split_template_args(list: &str) -> Vec<&str> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    let mut args = Vec::new();
    let mut angle: i32 = 0;
    let mut paren: i32 = 0;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => paren += 1,
            ')' => paren -= 1,
            '<' if paren == 0 => angle += 1,
            '>' if paren == 0 => angle -= 1,
            ',' if angle == 0 && paren == 0 => {
                args.push(list[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(list[start..].trim());
    args
}

/// The arguments between the first `<` and the last `>` of `name`.
pub fn template_args(name: &str) -> Vec<&str> {
    match (template_open(name), name.rfind('>')) {
        (Some(open), Some(close)) if close > open => split_template_args(&name[open + 1..close]),
        _ => Vec::new(),
    }
}

/// Position of the `<` opening a template argument list, skipping any
/// `<` inside parentheses.
fn template_open(name: &str) -> Option<usize> {
    let mut paren: i32 = 0;
    for (i, c) in name.char_indices() {
        match c {
            '(' => paren += 1,
            ')' => paren -= 1,
            '<' if paren == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Recover an instantiated function template name from its demangled
/// signature.
///
/// `add_template_to_name("f", "void NS::f<int,unsigned>(int)")` is
/// `"f<int,unsigned int>"`. Names that are not template instantiations are
/// returned unchanged.
pub fn add_template_to_name(base: &str, demangled: &str) -> String {
    let bytes = demangled.as_bytes();
    let Some(args_pos) = demangled.rfind('(') else {
        return base.to_string();
    };
    let is_instantiation = args_pos > 1
        && bytes[args_pos - 1] == b'>'
        && (bytes[args_pos - 2].is_ascii_alphanumeric() || bytes[args_pos - 2] == b'_');
    if !is_instantiation {
        return base.to_string();
    }
    let needle = format!("{base}<");
    match demangled.find(&needle) {
        Some(name_pos) if name_pos < args_pos => BARE_UNSIGNED
            .replace_all(&demangled[name_pos..args_pos], "unsigned int${3}")
            .into_owned(),
        _ => base.to_string(),
    }
}

/// Canonicalize integer literals in a name's template argument list:
/// `12u` and `12ul` become `12`, `-0x0000000000000001` becomes `-1`.
pub fn patch_template_literals(name: &str) -> String {
    let (Some(open), Some(close)) = (template_open(name), name.rfind('>')) else {
        return name.to_string();
    };
    if close <= open {
        return name.to_string();
    }
    let args = &name[open + 1..close];
    let args = INTEGER_SUFFIX.replace_all(args, "${1}");
    let args = PADDED_NEGATIVE_HEX.replace_all(&args, "-${1}");
    format!("{}{}{}", &name[..=open], args, &name[close..])
}
