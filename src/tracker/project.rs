use serde::Deserialize;
use serde::Serialize;

use super::entry::Entry;
use super::error::Error;

/// A node in the project tree. `name` holds only the path segment owned by
/// this node; the full path is the `/`-joined chain of segments from the root
/// down. The root of the tree is a synthetic node with an empty segment that
/// is never running or archived itself.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_running: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub children: Vec<Project>,
}

/// A resolved candidate: the full path of a node together with a borrow of
/// it. Selection among several candidates happens at the boundary, never in
/// here.
#[derive(Debug)]
pub struct Resolution<'a> {
    pub path: String,
    pub project: &'a Project,
}

impl Project {
    pub fn named(name: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            ..Project::default()
        }
    }

    /// Creates the project at `path`, along with any missing intermediate
    /// nodes. Fails if a node with that exact path already exists; a failed
    /// insert never changes the set of nodes.
    pub fn insert(&mut self, path: &str) -> Result<&mut Project, Error> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(Error::EmptyName);
        }

        let mut node = self;
        let mut created = false;
        for segment in segments {
            let index = match node.children.iter().position(|c| c.name == segment) {
                Some(index) => {
                    created = false;
                    index
                }
                None => {
                    node.children.push(Project::named(segment));
                    created = true;
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }

        if !created {
            return Err(Error::DuplicateName(path.to_string()));
        }
        Ok(node)
    }

    /// Finds projects by name. An exact full-path match wins outright;
    /// otherwise every node whose full path ends with `query` is returned in
    /// pre-order. Resolving a name nothing matches is an error.
    pub fn resolve(&self, query: &str) -> Result<Vec<Resolution<'_>>, Error> {
        let mut all = Vec::new();
        collect(self, "", &mut all);

        if all.iter().any(|r| r.path == query) {
            return Ok(all.into_iter().filter(|r| r.path == query).collect());
        }

        let matches: Vec<Resolution> = all
            .into_iter()
            .filter(|r| r.path.ends_with(query))
            .collect();
        if matches.is_empty() {
            return Err(Error::NotFound(query.to_string()));
        }
        Ok(matches)
    }

    /// Walks down to the node with the exact full path, if it exists.
    pub fn node(&self, path: &str) -> Option<&Project> {
        let mut node = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.children.iter().find(|c| c.name == segment)?;
        }
        Some(node)
    }

    /// Walks down to the node with the exact full path, if it exists. Used
    /// after resolution to get a mutable handle on the chosen project.
    pub fn node_mut(&mut self, path: &str) -> Option<&mut Project> {
        let mut node = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let index = node.children.iter().position(|c| c.name == segment)?;
            node = &mut node.children[index];
        }
        Some(node)
    }

    /// Sorts every node's children by segment name so serialized output is
    /// stable regardless of insertion order.
    pub fn canonicalize(&mut self) {
        self.children.sort_by(|a, b| a.name.cmp(&b.name));
        for child in &mut self.children {
            child.canonicalize();
        }
    }
}

fn collect<'a>(node: &'a Project, prefix: &str, out: &mut Vec<Resolution<'a>>) {
    for child in &node.children {
        let path = if prefix.is_empty() {
            child.name.clone()
        } else {
            format!("{prefix}/{}", child.name)
        };
        out.push(Resolution {
            path: path.clone(),
            project: child,
        });
        collect(child, &path, out);
    }
}
