//! Extension-to-category mapping used to pick a destination folder.
//!
//! The mapping keeps the order in which categories were declared. When an
//! extension is listed under more than one category, the first declared
//! category wins.
//!
//! # Examples
//!
//! ```
//! use foldersort::file_category::ExtensionMapping;
//!
//! let mapping = ExtensionMapping::from_pairs([
//!     ("Images", vec!["png", "jpg"]),
//!     ("Documents", vec!["pdf"]),
//! ]);
//! assert_eq!(mapping.folder_name("photo.png"), "images");
//! assert_eq!(mapping.folder_name("notes.xyz"), "others");
//! ```

use std::ffi::OsStr;

/// Folder used for files whose extension no category lists.
pub const FALLBACK_FOLDER: &str = "others";

/// A single named category and the extensions it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Label as written in the configuration (case preserved).
    pub name: String,
    /// Extensions without the leading dot, matched case-sensitively.
    pub extensions: Vec<String>,
}

impl Category {
    /// Returns the directory name for this category.
    ///
    /// ```
    /// use foldersort::file_category::Category;
    ///
    /// let category = Category { name: "Images".into(), extensions: vec![] };
    /// assert_eq!(category.dir_name(), "images");
    /// ```
    pub fn dir_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// True if this category lists `extension` exactly.
    pub fn claims(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext == extension)
    }
}

/// Ordered mapping from category labels to extension lists.
///
/// Immutable once built; construct it with [`ExtensionMapping::load`]
/// (see the `config` module) or [`ExtensionMapping::from_pairs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionMapping {
    categories: Vec<Category>,
}

impl ExtensionMapping {
    /// Builds a mapping from `(label, extensions)` pairs, keeping their order.
    ///
    /// A label that appears twice keeps its first position and takes the
    /// extensions of its last occurrence, the same way a JSON object with a
    /// repeated key is read.
    pub fn from_pairs<I, K, E, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut categories: Vec<Category> = Vec::new();
        for (name, extensions) in pairs {
            let name = name.into();
            let extensions: Vec<String> = extensions.into_iter().map(Into::into).collect();
            match categories.iter_mut().find(|c| c.name == name) {
                Some(existing) => existing.extensions = extensions,
                None => categories.push(Category { name, extensions }),
            }
        }
        Self { categories }
    }

    /// Categories in declaration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Returns the first category that lists `extension`, if any.
    pub fn category_for(&self, extension: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.claims(extension))
    }

    /// Resolves the destination folder name for a file name.
    ///
    /// This is the lower-cased label of the first matching category, or
    /// [`FALLBACK_FOLDER`] when nothing matches or the matched label is empty.
    pub fn folder_name(&self, file_name: impl AsRef<OsStr>) -> String {
        let extension = extension_of(file_name.as_ref());
        self.category_for(&extension)
            .map(Category::dir_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_FOLDER.to_string())
    }
}

/// Extracts the extension of a file name, without the dot.
///
/// Returns an empty string when the name has no extension. Leading dots do
/// not start an extension, so `.bashrc` and `..bashrc` have none.
///
/// ```
/// use foldersort::file_category::extension_of;
/// use std::ffi::OsStr;
///
/// assert_eq!(extension_of(OsStr::new("archive.tar.gz")), "gz");
/// assert_eq!(extension_of(OsStr::new("Makefile")), "");
/// assert_eq!(extension_of(OsStr::new(".bashrc")), "");
/// ```
pub fn extension_of(file_name: &OsStr) -> String {
    let name = file_name.to_string_lossy();
    let stem = name.trim_start_matches('.');
    stem.rfind('.')
        .map(|dot| stem[dot + 1..].to_string())
        .unwrap_or_default()
}
