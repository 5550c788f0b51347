//! Opens and closes group scopes while walking the display list.

use std::collections::HashSet;

use crate::group::GroupId;

/// Start/end callbacks for groups.
///
/// `start` returns whether the group's contents should be drawn. Every
/// `start` that returns true is paired with exactly one `end`.
pub trait ScopeHooks {
    fn start(&mut self, group: GroupId) -> bool;
    fn end(&mut self, group: GroupId);
}

/// Tracks the chain of open groups across consecutive display items.
#[derive(Debug, Default)]
pub struct ScopeWalker {
    open: Vec<GroupId>,
    hidden: HashSet<GroupId>,
}

impl ScopeWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `required` (root first) the open chain. Returns false when the
    /// item must be skipped because one of its groups is hidden.
    ///
    /// Groups shared with the previous chain stay open. Groups that are no
    /// longer needed end innermost first; a hidden group is un-hidden instead
    /// of ended, and groups below a hidden one were never started so they
    /// are dropped silently.
    pub fn enter(&mut self, required: &[GroupId], hooks: &mut impl ScopeHooks) -> bool {
        if required.iter().any(|g| self.hidden.contains(g)) {
            return false;
        }

        let divergence = self
            .open
            .iter()
            .zip(required)
            .take_while(|(a, b)| a == b)
            .count();
        self.close_from(divergence, hooks);

        for group in &required[divergence..] {
            if !hooks.start(*group) {
                self.hidden.insert(*group);
                self.open = required.to_vec();
                return false;
            }
            self.open.push(*group);
        }
        true
    }

    /// Ends every group still open.
    pub fn finish(&mut self, hooks: &mut impl ScopeHooks) {
        self.close_from(0, hooks);
        self.hidden.clear();
    }

    fn close_from(&mut self, from: usize, hooks: &mut impl ScopeHooks) {
        for i in (from..self.open.len()).rev() {
            let group = self.open[i];
            if self.hidden.remove(&group) {
                continue;
            }
            if self.open[..i].iter().any(|g| self.hidden.contains(g)) {
                continue;
            }
            hooks.end(group);
        }
        self.open.truncate(from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: GroupId = GroupId::ROOT;

    struct Recorder {
        names: Vec<(GroupId, &'static str)>,
        hidden: Vec<GroupId>,
        log: Vec<String>,
    }

    impl Recorder {
        fn name(&self, group: GroupId) -> &'static str {
            self.names
                .iter()
                .find(|(g, _)| *g == group)
                .map_or("?", |(_, n)| *n)
        }
    }

    impl ScopeHooks for Recorder {
        fn start(&mut self, group: GroupId) -> bool {
            if group == ROOT {
                return true;
            }
            let name = self.name(group);
            self.log.push(format!("{name}.start"));
            !self.hidden.contains(&group)
        }

        fn end(&mut self, group: GroupId) {
            if group == ROOT {
                return;
            }
            let name = self.name(group);
            self.log.push(format!("{name}.end"));
        }
    }

    fn run(recorder: &mut Recorder, items: &[(&'static str, Vec<GroupId>)]) {
        let mut walker = ScopeWalker::new();
        for (item, chain) in items {
            if walker.enter(chain, recorder) {
                recorder.log.push((*item).to_string());
            }
        }
        walker.finish(recorder);
    }

    fn ids() -> (GroupId, GroupId, GroupId) {
        let mut tree = crate::group::GroupTree::new();
        let a = tree.get_or_create("A");
        let b = tree.get_or_create("A/B");
        let c = tree.get_or_create("C");
        (a, b, c)
    }

    fn recorder(hidden: Vec<GroupId>) -> Recorder {
        let (a, b, c) = ids();
        Recorder {
            names: vec![(a, "A"), (b, "B"), (c, "C")],
            hidden,
            log: Vec::new(),
        }
    }

    #[test]
    fn reentering_an_open_group_does_not_restart_it() {
        let (a, b, _) = ids();
        let mut rec = recorder(vec![]);
        run(
            &mut rec,
            &[
                ("inA", vec![ROOT, a]),
                ("inAB", vec![ROOT, a, b]),
                ("inA2", vec![ROOT, a]),
            ],
        );
        assert_eq!(
            rec.log,
            vec!["A.start", "inA", "B.start", "inAB", "B.end", "inA2", "A.end"]
        );
    }

    #[test]
    fn switching_groups_closes_innermost_first() {
        let (a, b, c) = ids();
        let mut rec = recorder(vec![]);
        run(&mut rec, &[("x", vec![ROOT, a, b]), ("y", vec![ROOT, c])]);
        assert_eq!(
            rec.log,
            vec!["A.start", "B.start", "x", "B.end", "A.end", "C.start", "y", "C.end"]
        );
    }

    #[test]
    fn hidden_group_skips_its_items_and_is_never_ended() {
        let (a, b, c) = ids();
        let mut rec = recorder(vec![a]);
        run(
            &mut rec,
            &[
                ("inA", vec![ROOT, a]),
                ("inAB", vec![ROOT, a, b]),
                ("inC", vec![ROOT, c]),
            ],
        );
        assert_eq!(rec.log, vec!["A.start", "C.start", "inC", "C.end"]);
    }

    #[test]
    fn hidden_inner_group_keeps_outer_open() {
        let (a, b, c) = ids();
        let mut rec = recorder(vec![b]);
        run(
            &mut rec,
            &[
                ("inA", vec![ROOT, a]),
                ("inAB", vec![ROOT, a, b]),
                ("inAB2", vec![ROOT, a, b]),
                ("inA2", vec![ROOT, a]),
                ("inC", vec![ROOT, c]),
            ],
        );
        assert_eq!(
            rec.log,
            vec!["A.start", "inA", "B.start", "inA2", "A.end", "C.start", "inC", "C.end"]
        );
    }

    #[test]
    fn hidden_state_resets_after_leaving_the_group() {
        let (a, _, c) = ids();
        let mut rec = recorder(vec![a]);
        run(
            &mut rec,
            &[("inA", vec![ROOT, a]), ("inC", vec![ROOT, c]), ("inA2", vec![ROOT, a])],
        );
        assert_eq!(
            rec.log,
            vec!["A.start", "C.start", "inC", "C.end", "A.start"]
        );
    }
}
