//! Group tree construction.
//!
//! Group annotations name slash-separated paths. Every prefix of a path is a
//! node in a [`GroupTree`] rooted at `"root"`. Each member is placed in its
//! deepest group and the display list is arranged so members sharing group
//! prefixes are contiguous, which lets the scope walker open and close each
//! group once per run.

use std::collections::HashMap;

use crate::annotation::{GroupAnnotation, GroupKind};

/// Index of a node in a [`GroupTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl GroupId {
    pub const ROOT: GroupId = GroupId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

/// Tab groups sharing one parent, with the selected tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabCoordinator {
    siblings: Vec<GroupId>,
    selected: usize,
}

impl TabCoordinator {
    pub fn siblings(&self) -> &[GroupId] {
        &self.siblings
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_group(&self) -> Option<GroupId> {
        self.siblings.get(self.selected).copied()
    }

    /// Adds a sibling unless it is already registered.
    pub fn add(&mut self, group: GroupId) {
        if !self.siblings.contains(&group) {
            self.siblings.push(group);
        }
        self.clamp();
    }

    pub fn remove(&mut self, group: GroupId) {
        self.siblings.retain(|g| *g != group);
        self.clamp();
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.selected = self.selected.min(self.siblings.len().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GroupNode {
    /// Full path, `"root"` for the root node.
    pub path: String,
    /// Last path segment.
    pub name: String,
    /// Node ids from the root to this node, both inclusive.
    pub chain: Vec<GroupId>,
    /// `None` until an annotation names this exact path.
    pub kind: Option<GroupKind>,
    pub title: Option<String>,
    pub show_title: bool,
    pub back_color: Option<u32>,
    /// Foldout state.
    pub open: bool,
    /// Present on parents of tab groups.
    pub tabs: Option<TabCoordinator>,
}

impl GroupNode {
    fn new(path: String, name: String, chain: Vec<GroupId>) -> Self {
        Self {
            path,
            name,
            chain,
            kind: None,
            title: None,
            show_title: true,
            back_color: None,
            open: true,
            tabs: None,
        }
    }

    pub fn id(&self) -> GroupId {
        self.chain.last().copied().unwrap_or(GroupId::ROOT)
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.chain.len().checked_sub(2).map(|i| self.chain[i])
    }

    /// Title shown in the group header, if the group shows one.
    pub fn header_title(&self) -> Option<&str> {
        if !self.show_title {
            return None;
        }
        Some(self.title.as_deref().unwrap_or(&self.name))
    }

    /// Title used on the tab button.
    pub fn tab_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Merges an annotation into this node. Fails when the annotation's kind
    /// conflicts with the kind already recorded.
    pub fn apply(&mut self, annotation: &GroupAnnotation) -> Result<(), String> {
        match (self.kind, annotation.kind) {
            (None, kind) | (Some(GroupKind::Placeholder), kind) => self.kind = Some(kind),
            (Some(_), GroupKind::Placeholder) => {}
            (Some(existing), kind) if existing == kind => {}
            (Some(existing), kind) => {
                return Err(format!(
                    "Group type {} is different from original {} for group '{}'!",
                    kind.name(),
                    existing.name(),
                    self.path
                ));
            }
        }
        if annotation.title.is_some() {
            self.title = annotation.title.clone();
        }
        if !annotation.show_title {
            self.show_title = false;
        }
        if annotation.back_color.is_some() {
            self.back_color = annotation.back_color;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GroupTree {
    nodes: Vec<GroupNode>,
    by_path: HashMap<String, GroupId>,
}

impl Default for GroupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupTree {
    pub const ROOT_NAME: &'static str = "root";

    pub fn new() -> Self {
        let root = GroupNode::new(
            Self::ROOT_NAME.to_string(),
            Self::ROOT_NAME.to_string(),
            vec![GroupId::ROOT],
        );
        Self {
            nodes: vec![root],
            by_path: HashMap::new(),
        }
    }

    pub fn node(&self, id: GroupId) -> &GroupNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: GroupId) -> &mut GroupNode {
        &mut self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[GroupNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn find(&self, path: &str) -> Option<GroupId> {
        if path == Self::ROOT_NAME {
            return Some(GroupId::ROOT);
        }
        self.by_path.get(path).copied()
    }

    /// Returns the node for `path`, creating it and any missing prefixes.
    /// Empty segments are ignored; an empty path is the root.
    pub fn get_or_create(&mut self, path: &str) -> GroupId {
        let mut chain = vec![GroupId::ROOT];
        let mut prefix = String::new();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            let id = match self.by_path.get(&prefix) {
                Some(id) => *id,
                None => {
                    let id = GroupId(self.nodes.len());
                    let mut node_chain = chain.clone();
                    node_chain.push(id);
                    self.nodes
                        .push(GroupNode::new(prefix.clone(), segment.to_string(), node_chain));
                    self.by_path.insert(prefix.clone(), id);
                    id
                }
            };
            chain.push(id);
        }

        chain.last().copied().unwrap_or(GroupId::ROOT)
    }

    /// Registers every tab group with its parent's coordinator. Returns an
    /// error message for each tab group without a parent.
    pub fn wire_tabs(&mut self) -> Vec<String> {
        let mut errors = Vec::new();
        for index in 0..self.nodes.len() {
            if self.nodes[index].kind != Some(GroupKind::Tab) {
                continue;
            }
            let id = GroupId(index);
            match self.nodes[index].parent() {
                Some(parent) => self.nodes[parent.0]
                    .tabs
                    .get_or_insert_with(TabCoordinator::default)
                    .add(id),
                None => {
                    let message = format!(
                        "Tab group '{}' has no parent group to host its tabs",
                        self.nodes[index].path
                    );
                    log::error!("{message}");
                    errors.push(message);
                }
            }
        }
        errors
    }

    /// Coordinator that `tab` belongs to.
    pub fn coordinator_of(&self, tab: GroupId) -> Option<&TabCoordinator> {
        let parent = self.node(tab).parent()?;
        self.node(parent).tabs.as_ref()
    }

    pub fn coordinator_of_mut(&mut self, tab: GroupId) -> Option<&mut TabCoordinator> {
        let parent = self.node(tab).parent()?;
        self.node_mut(parent).tabs.as_mut()
    }
}

// ---------------------------------------------------------------------------
// Display list
// ---------------------------------------------------------------------------

/// A member as seen by the group builder.
pub trait Grouped {
    fn group_annotations(&self) -> Vec<GroupAnnotation>;
    fn set_group(&mut self, group: GroupId);
    fn group(&self) -> GroupId;
    fn report_error(&mut self, message: String);
}

/// Builds the group tree for `ordered` members and arranges them into the
/// display list.
///
/// Each member goes to the deepest of its groups (the first one on ties).
/// It is then inserted right after the last already-placed member whose
/// chain shares the longest prefix with its own, so members of the same
/// group stay contiguous and keep their relative order.
pub fn build_display<T: Grouped>(ordered: Vec<T>) -> (GroupTree, Vec<T>) {
    let mut tree = GroupTree::new();
    let mut display: Vec<T> = Vec::with_capacity(ordered.len());

    for mut item in ordered {
        let mut main = GroupId::ROOT;
        let mut errors = Vec::new();

        for annotation in item.group_annotations() {
            let id = tree.get_or_create(&annotation.path);
            if let Err(message) = tree.node_mut(id).apply(&annotation) {
                errors.push(message);
            }
            if tree.node(id).chain.len() > tree.node(main).chain.len() {
                main = id;
            }
        }
        for message in errors {
            log::warn!("{message}");
            item.report_error(message);
        }
        item.set_group(main);

        let chain = &tree.node(main).chain;
        let mut best_len = 0;
        let mut insert_at = display.len();
        for (index, placed) in display.iter().enumerate() {
            let placed_chain = &tree.node(placed.group()).chain;
            let common = chain
                .iter()
                .zip(placed_chain)
                .take_while(|(a, b)| a == b)
                .count();
            if common >= best_len {
                best_len = common;
                insert_at = index + 1;
            }
        }
        display.insert(insert_at, item);
    }

    (tree, display)
}
