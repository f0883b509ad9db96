//! Source synthesis for replacement classes.
//!
//! A replacement shares only its fully-qualified name with the original
//! class. Fields, methods and supertypes are not carried over.

use std::fmt;
use std::path::PathBuf;


/// File suffix identifying compiled classes in an archive
pub const CLASS_SUFFIX: &str = ".class";

/// Suffix of synthesized source files
pub const SOURCE_SUFFIX: &str = ".java";

/// Fully-qualified class identity derived from an archive entry name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassIdentity {
    pub package_segments: Vec<String>,
    pub simple_name: String,
}

impl ClassIdentity {
    /// Derive the identity from an entry path such as `a/b/C.class`.
    ///
    /// Segments are not validated as identifiers.
    pub fn from_entry_name(entry_name: &str) -> Self {
        let mut segments: Vec<String> = entry_name.split('/').map(str::to_string).collect();
        let last = segments.pop().unwrap_or_default();
        let simple_name = last
            .strip_suffix(CLASS_SUFFIX)
            .unwrap_or(&last)
            .to_string();

        Self {
            package_segments: segments,
            simple_name,
        }
    }

    /// Dotted package name, empty for the default package
    pub fn package_name(&self) -> String {
        self.package_segments.join(".")
    }

    /// Package directory relative to a source root, `/`-joined
    pub fn package_dir(&self) -> PathBuf {
        PathBuf::from(self.package_segments.join("/"))
    }

    pub fn is_default_package(&self) -> bool {
        self.package_segments.is_empty()
    }

    /// Source file path relative to a source root
    pub fn source_path(&self) -> PathBuf {
        self.package_dir()
            .join(format!("{}{}", self.simple_name, SOURCE_SUFFIX))
    }

    /// Compiled class path relative to a source root
    pub fn class_path(&self) -> PathBuf {
        self.package_dir()
            .join(format!("{}{}", self.simple_name, CLASS_SUFFIX))
    }
}

impl fmt::Display for ClassIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default_package() {
            write!(f, "{}", self.simple_name)
        } else {
            write!(f, "{}.{}", self.package_name(), self.simple_name)
        }
    }
}

/// Emit a compilation unit declaring `identity` with `payload` as the body
/// of its static initializer. No other members are declared.
pub fn synthesize(identity: &ClassIdentity, payload: &str) -> String {
    let mut source = String::new();

    if !identity.is_default_package() {
        source.push_str(&format!("package {};\n\n", identity.package_name()));
    }

    source.push_str(&format!("public class {} {{\n", identity.simple_name));
    source.push_str("    static {\n");
    source.push_str(payload);
    source.push_str("\n    }\n");
    source.push_str("}\n");

    source
}
