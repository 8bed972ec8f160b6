//! In-place repair of GCC-XML spelling quirks.
//!
//! GCC-XML reports some names in forms that do not round-trip through the
//! rest of the pipeline:
//!
//! - array bounds carry an unsigned suffix (`max="9u"`)
//! - instantiated function templates are named without their arguments
//!   (`f` for `f<int>`); the arguments are recovered from `demangled`
//! - operators are named by their symbol alone (`=`, `new []`) and
//!   conversion operators sometimes by a mangled fragment
//! - template arguments contain suffixed or padded integer literals
//! - builtin type names use long synonyms (`long unsigned int`)

use cxx_types::normalize::{add_template_to_name, patch_template_literals};
use cxx_types::Normalizer;
use tracing::trace;

use crate::{Document, NodeKind, Record};

/// Prefix of compiler-generated vtable/typeinfo symbol names.
const COMPILER_SYMBOL: &str = "_ZT";

/// Repair every record of `doc`.
#[tracing::instrument(level = "debug", skip_all, fields(records = doc.len()))]
pub fn fixup(doc: &mut Document, normalizer: &Normalizer) {
    for record in doc.records_mut() {
        fixup_record(record, normalizer);
    }
}

fn fixup_record(record: &mut Record, normalizer: &Normalizer) {
    match record.kind {
        NodeKind::ArrayType => {
            let max = record.attr_or_empty("max").trim_end_matches('u').to_string();
            record.set_attr("max", max);
        }
        NodeKind::Class | NodeKind::Struct | NodeKind::Union => {
            let patched = patch_template_literals(record.name());
            rename(record, patched);
        }
        NodeKind::Function => {
            let name = with_template_args(record, record.name());
            rename(record, name);
        }
        NodeKind::OperatorFunction | NodeKind::OperatorMethod | NodeKind::Converter => {
            let op = operator_name(record.name(), record.attr_or_empty("demangled"));
            let name = if op.starts_with(COMPILER_SYMBOL) {
                op
            } else {
                with_template_args(record, &op)
            };
            rename(record, name);
        }
        NodeKind::Constructor | NodeKind::Method => {
            if !record.name().starts_with(COMPILER_SYMBOL) {
                let name = with_template_args(record, record.name());
                rename(record, name);
            }
        }
        NodeKind::FundamentalType => {
            let name = normalizer.normalize(record.name(), false);
            rename(record, name);
        }
        _ => {}
    }
}

fn with_template_args(record: &Record, name: &str) -> String {
    patch_template_literals(&add_template_to_name(
        name,
        record.attr_or_empty("demangled"),
    ))
}

fn rename(record: &mut Record, name: String) {
    if name != record.name() {
        trace!(id = %record.id, from = record.name(), to = %name, "renamed");
        record.set_name(name);
    }
}

/// Canonical `operator` spelling of an operator or converter name.
///
/// - `=` becomes `operator=`, `new` becomes `operator new`
/// - `operator ==` becomes `operator==`
/// - `operator 5Outer` (a mangled type fragment) is recovered from the
///   demangled signature
pub fn operator_name(name: &str, demangled: &str) -> String {
    let Some(rest) = name.strip_prefix("operator") else {
        return match name.chars().next() {
            None => String::new(),
            Some(c) if c.is_ascii_alphabetic() => format!("operator {name}"),
            Some(_) => format!("operator{name}"),
        };
    };
    let Some(spelled) = rest.strip_prefix(' ') else {
        return name.to_string();
    };
    match spelled.bytes().next() {
        Some(c) if c.is_ascii_digit() => {
            from_demangled(demangled).unwrap_or_else(|| name.to_string())
        }
        Some(c) if !c.is_ascii_alphabetic() && c != b'_' => format!("operator{spelled}"),
        _ => name.to_string(),
    }
}

/// `operator...` up to the parameter list of a demangled signature.
fn from_demangled(demangled: &str) -> Option<String> {
    let start = match demangled.find("::operator") {
        Some(pos) => pos + 2,
        None => demangled.find("operator")?,
    };
    let end = demangled[start..]
        .find('(')
        .map_or(demangled.len(), |pos| start + pos);
    let op = demangled[start..end].trim_end();
    (!op.is_empty()).then(|| op.to_string())
}
