//! Source module - files in the source inventory and their page text

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Physical page number (1-based) to page text
pub type PageMap = BTreeMap<u32, String>;

/// A PDF in the source inventory whose name follows `<Surname>_<YYYY>[suffix].pdf`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name including extension
    pub file_name: String,
    /// Surname token as written in the file name
    pub surname: String,
    /// Four-digit year from the file name
    pub year: u16,
}

impl SourceFile {
    /// Path as a display string, the form stored in claim records
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}
