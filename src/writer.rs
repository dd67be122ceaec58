/*!
 * Dump writer: assembles the consolidated document
 */

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::output;
use crate::persona::Persona;
use crate::tree::render_tree;
use crate::types::{FileContent, IncludedFile};
use crate::utils::format_file_size;

/// Heading above the directory tree
pub const TREE_HEADING: &str = "## 📁 File Structure";

/// Heading above the file blocks
pub const CONTENTS_HEADING: &str = "## 📄 File Contents";

/// Markdown writer for a project's files
pub struct DumpWriter {
    /// Optional instruction block placed first
    persona: Option<Persona>,
}

impl DumpWriter {
    /// Create a new dump writer
    pub fn new(persona: Option<Persona>) -> Self {
        Self { persona }
    }

    /// Build the full document in memory
    pub fn render(&self, project_name: &str, files: &[IncludedFile]) -> String {
        let mut doc = String::new();
        push_preamble(&mut doc, self.persona);

        doc.push_str(TREE_HEADING);
        doc.push_str("\n\n");
        doc.push_str(&render_tree(project_name, files.iter().map(|f| f.path.as_str())));
        doc.push_str("\n\n");

        doc.push_str(CONTENTS_HEADING);
        doc.push_str("\n\n");
        for file in files {
            self.write_file(&mut doc, file);
        }

        doc
    }

    /// Render and persist under a collision-free name in `root`
    pub fn write(&self, root: &Path, files: &[IncludedFile]) -> Result<PathBuf> {
        let name = output::project_name(root);
        let doc = self.render(&name, files);
        output::write_new(root, &name, &doc)
    }

    /// Write one file block
    fn write_file(&self, doc: &mut String, file: &IncludedFile) {
        doc.push_str("### ");
        doc.push_str(&file.path);
        doc.push('\n');

        match &file.content {
            FileContent::Text(text) => {
                let fence = fence_for(text);
                doc.push_str(&fence);
                doc.push('\n');
                doc.push_str(text);
                if !text.is_empty() && !text.ends_with('\n') {
                    doc.push('\n');
                }
                doc.push_str(&fence);
                doc.push_str("\n\n");
            }
            FileContent::Binary => {
                doc.push_str(&format!(
                    "_[binary file skipped: {}]_\n\n",
                    format_file_size(file.size)
                ));
            }
            FileContent::TooLarge => {
                doc.push_str(&format!(
                    "_[content omitted: {} exceeds limit]_\n\n",
                    format_file_size(file.size)
                ));
            }
        }
    }
}

/// Persona text followed by a blank line, when a persona is set
pub(crate) fn push_preamble(doc: &mut String, persona: Option<Persona>) {
    if let Some(persona) = persona {
        doc.push_str(persona.preamble());
        doc.push('\n');
    }
}

/// A backtick fence longer than any backtick run inside `text`
pub(crate) fn fence_for(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}
