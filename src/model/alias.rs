use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([^{}]+)\}").unwrap();
}

/// Caller-supplied mapping from flattened series metadata to a display name.
pub type AliasFn = Box<dyn Fn(&HashMap<String, String>) -> Option<String>>;

/// A user-defined series renaming rule, applied against the flattened
/// metadata of a series (`metric` plus one `tags.<key>` entry per tag).
///
/// Templates reference metadata with `{...}` placeholders, e.g.
/// `"{metric} on {tags.host}"`. Functions receive the metadata map directly.
/// Either way, a rule that fails (unknown placeholder, `None` from the
/// function) or produces an empty string never surfaces an error — the
/// series falls back to its canonical id.
pub enum AliasTransform {
    Template(String),
    Func(AliasFn),
}

impl AliasTransform {
    pub fn template(template: impl Into<String>) -> Self {
        AliasTransform::Template(template.into())
    }

    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&HashMap<String, String>) -> Option<String> + 'static,
    {
        AliasTransform::Func(Box::new(f))
    }

    // None signals failure; the caller decides on the fallback.
    pub(crate) fn apply(&self, metadata: &HashMap<String, String>) -> Option<String> {
        match self {
            AliasTransform::Template(template) => {
                let mut out = String::with_capacity(template.len());
                let mut last = 0;
                for caps in PLACEHOLDER.captures_iter(template) {
                    let m = caps.get(0).unwrap();
                    out.push_str(&template[last..m.start()]);
                    out.push_str(metadata.get(&caps[1])?);
                    last = m.end();
                }
                out.push_str(&template[last..]);
                Some(out)
            }
            AliasTransform::Func(f) => f(metadata),
        }
    }
}

impl From<&str> for AliasTransform {
    fn from(template: &str) -> Self {
        AliasTransform::template(template)
    }
}

impl From<String> for AliasTransform {
    fn from(template: String) -> Self {
        AliasTransform::Template(template)
    }
}

impl fmt::Debug for AliasTransform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AliasTransform::Template(t) => write!(f, "AliasTransform::Template({:?})", t),
            AliasTransform::Func(_) => write!(f, "AliasTransform::Func(..)"),
        }
    }
}
