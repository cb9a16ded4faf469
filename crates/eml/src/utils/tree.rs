//! Folder trees built from the original archive paths of emails

use serde::Serialize;

use crate::models::{EmailId, EmailMessage};

/// A folder or file node keyed by a sanitized id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathTreeNode {
    pub id: String,
    pub label: String,
    pub path: String,
    pub children: Vec<PathTreeNode>,
    pub is_leaf: bool,
    pub email_count: u32,
}

/// A folder or email node keyed by its cumulative path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTreeNode {
    pub path: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<EmailTreeNode>>,
    pub is_file: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<EmailId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    pub parent_path: String,
}

/// Turn a path into an id usable as a DOM key
///
/// Slashes of either kind become `_`; anything outside `[A-Za-z0-9_-]`
/// is dropped.
pub fn generate_tree_node_id(path: &str) -> String {
    path.chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty())
}

/// Build a folder tree from a list of paths
///
/// Nodes are shared between paths by id. A node's `is_leaf` reflects the
/// path that created it; `email_count` counts the paths ending there.
pub fn parse_paths_to_tree<S: AsRef<str>>(paths: &[S]) -> Vec<PathTreeNode> {
    let mut tree = Vec::new();

    for path in paths {
        let parts: Vec<&str> = segments(path.as_ref()).collect();
        let mut level: &mut Vec<PathTreeNode> = &mut tree;
        let mut current = String::new();

        for (index, part) in parts.iter().enumerate() {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(part);
            let is_last = index + 1 == parts.len();
            let id = generate_tree_node_id(&current);

            let pos = match level.iter().position(|n| n.id == id) {
                Some(pos) => pos,
                None => {
                    level.push(PathTreeNode {
                        id,
                        label: part.to_string(),
                        path: current.clone(),
                        children: Vec::new(),
                        is_leaf: is_last,
                        email_count: 0,
                    });
                    level.len() - 1
                }
            };

            let node = &mut level[pos];
            if is_last {
                node.email_count += 1;
            }
            level = &mut node.children;
        }
    }

    tree
}

/// Build a tree of folders and emails from `(id, original_path)` pairs
///
/// The last segment of each path is the email itself. Folder counts are
/// the number of emails below them. With `show_count` off every count is
/// cleared. A node first created as a file keeps `children: None`, and
/// deeper segments under it are placed at its level.
pub fn build_email_path_tree<'a, I>(emails: I, show_count: bool) -> Vec<EmailTreeNode>
where
    I: IntoIterator<Item = (EmailId, &'a str)>,
{
    let mut tree = Vec::new();

    for (email_id, path) in emails {
        let parts: Vec<&str> = segments(path).collect();
        let mut level: &mut Vec<EmailTreeNode> = &mut tree;
        let mut current = String::new();

        for (index, part) in parts.iter().enumerate() {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(part);
            let is_file = index + 1 == parts.len();

            let pos = match level.iter().position(|n| n.path == current) {
                Some(pos) => pos,
                None => {
                    let parent_path = current
                        .rfind('/')
                        .map(|i| current[..i].to_string())
                        .unwrap_or_default();
                    level.push(EmailTreeNode {
                        path: current.clone(),
                        label: part.to_string(),
                        children: if is_file { None } else { Some(Vec::new()) },
                        is_file,
                        email_id: is_file.then_some(email_id),
                        count: Some(0),
                        parent_path,
                    });
                    level.len() - 1
                }
            };

            let node = &mut level[pos];
            if is_file {
                node.email_id = Some(email_id);
                node.count = Some(1);
            } else {
                node.count = Some(node.count.unwrap_or(0) + 1);
            }

            let descend = !is_file && node.children.is_some();
            if descend {
                level = level[pos].children.get_or_insert_with(Vec::new);
            }
        }
    }

    if !show_count {
        clear_counts(&mut tree);
    }
    tree
}

/// [`build_email_path_tree`] over loaded emails that carry an original path
pub fn email_path_tree(emails: &[EmailMessage], show_count: bool) -> Vec<EmailTreeNode> {
    build_email_path_tree(
        emails
            .iter()
            .filter(|e| !e.original_path.is_empty())
            .map(|e| (e.id, e.original_path.as_str())),
        show_count,
    )
}

fn clear_counts(nodes: &mut [EmailTreeNode]) {
    for node in nodes {
        node.count = None;
        if let Some(children) = node.children.as_mut() {
            clear_counts(children);
        }
    }
}
