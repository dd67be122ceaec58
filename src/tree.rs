//! Directory tree rendering.
//!
//! The tree is purely a function of the set of relative paths. Children are
//! kept in `BTreeMap`/`BTreeSet` so the output never depends on the order in
//! which paths were discovered.

use std::collections::{BTreeMap, BTreeSet};

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

#[derive(Debug, Default)]
struct DirNode {
    dirs: BTreeMap<String, DirNode>,
    files: BTreeSet<String>,
}

impl DirNode {
    fn insert(&mut self, path: &str) {
        let mut parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let Some(file) = parts.pop() else {
            return;
        };
        let mut node = self;
        for dir in parts {
            node = node.dirs.entry(dir.to_string()).or_default();
        }
        node.files.insert(file.to_string());
    }

    fn render(&self, prefix: &str, out: &mut Vec<String>) {
        let total = self.dirs.len() + self.files.len();
        let mut index = 0;

        for (name, child) in &self.dirs {
            index += 1;
            let last = index == total;
            out.push(format!("{}{}{}/", prefix, if last { LAST } else { BRANCH }, name));
            let extension = if last { SPACE } else { PIPE };
            child.render(&format!("{}{}", prefix, extension), out);
        }

        for name in &self.files {
            index += 1;
            let last = index == total;
            out.push(format!("{}{}{}", prefix, if last { LAST } else { BRANCH }, name));
        }
    }
}

/// Render `paths` (relative, `/`-separated) under a `root_name/` heading.
pub fn render_tree<I, S>(root_name: &str, paths: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = DirNode::default();
    for path in paths {
        root.insert(path.as_ref());
    }

    let mut lines = vec![format!("{}/", root_name)];
    root.render("", &mut lines);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_renders_root_only() {
        assert_eq!(render_tree::<_, &str>("Foo", []), "Foo/");
    }

    #[test]
    fn directories_come_before_files() {
        let tree = render_tree(
            "proj",
            ["README.md", "src/main.rs", "src/util/io.rs", "src/lib.rs", "Cargo.toml"],
        );
        let expected = "\
proj/
├── src/
│   ├── util/
│   │   └── io.rs
│   ├── lib.rs
│   └── main.rs
├── Cargo.toml
└── README.md";
        assert_eq!(tree, expected);
    }

    #[test]
    fn last_directory_uses_blank_continuation() {
        let tree = render_tree("p", ["a.py", "z/b.py", "z/c/d.py"]);
        let expected = "\
p/
├── z/
│   ├── c/
│   │   └── d.py
│   └── b.py
└── a.py";
        assert_eq!(tree, expected);

        let tree = render_tree("p", ["only/x.rs", "only/y.rs"]);
        let expected = "\
p/
└── only/
    ├── x.rs
    └── y.rs";
        assert_eq!(tree, expected);
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let forward = render_tree("p", ["a/1.rs", "a/2.rs", "b.rs", "c/d/e.rs"]);
        let backward = render_tree("p", ["c/d/e.rs", "b.rs", "a/2.rs", "a/1.rs"]);
        assert_eq!(forward, backward);
    }
}
