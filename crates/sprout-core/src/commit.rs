//! Commit phase
//!
//! Applies the effects collected during the render phase to the host in one
//! pass and promotes the work-in-progress tree to current.

use crate::hooks::HookCell;
use crate::host::{remove_listeners, update_properties};
use crate::{EffectTag, FiberId, FiberKind, HostBinding, RenderError, RenderResult, Renderer};

impl<H: HostBinding> Renderer<H> {
    /// Commit the finished work-in-progress tree.
    ///
    /// On failure the work-in-progress tree is discarded and the previously
    /// committed tree stays current.
    pub fn commit(&mut self) -> RenderResult<()> {
        let Some(wip) = self.wip_root else {
            return Ok(());
        };
        if self.next_unit.is_some() {
            return Err(RenderError::Invariant("commit requested before the render pass finished"));
        }

        let (mutations, components) = match self.commit_effects(wip) {
            Ok(done) => done,
            Err(err) => {
                tracing::error!("Commit failed: {}", err);
                self.discard_work_in_progress();
                return Err(err);
            }
        };

        // Queued hook actions are only dropped once nothing can fail anymore.
        for id in components {
            self.fibers.get_mut(id)?.hooks.iter_mut().for_each(HookCell::settle);
        }
        self.deletions.clear();
        self.wip_root = None;
        let previous = self.current_root.replace(wip);
        let released = previous.map_or(0, |old| self.fibers.release(old));
        self.stats.commits += 1;
        tracing::debug!(
            "Committed {} ({} host mutations, {} stale fibers released)",
            wip,
            mutations,
            released
        );
        Ok(())
    }

    /// Apply every host effect. Returns the mutation count and the component
    /// fibers whose hook cells become current.
    fn commit_effects(&mut self, wip: FiberId) -> RenderResult<(usize, Vec<FiberId>)> {
        let mut mutations = 0;
        for id in self.deletions.clone() {
            mutations += self.commit_deletion(id)?;
        }

        let mut components = Vec::new();
        let mut stack: Vec<FiberId> = self.fibers.get(wip)?.child.into_iter().collect();
        while let Some(id) = stack.pop() {
            let is_component = match &self.fibers.get(id)?.kind {
                FiberKind::Text | FiberKind::Host(_) => false,
                FiberKind::Component(_) => true,
                FiberKind::Root => {
                    return Err(RenderError::Invariant("root fiber below the root"));
                }
            };
            if is_component {
                components.push(id);
            } else {
                mutations += self.commit_work(id)?;
            }
            let fiber = self.fibers.get(id)?;
            stack.extend(fiber.sibling);
            stack.extend(fiber.child);
        }
        Ok((mutations, components))
    }

    fn commit_work(&mut self, id: FiberId) -> RenderResult<usize> {
        let fiber = self.fibers.get(id)?;
        let node = fiber
            .host_node
            .clone()
            .ok_or(RenderError::Invariant("host fiber reached commit without a host node"))?;
        match fiber.effect_tag {
            Some(EffectTag::Placement) => {
                let parent = self.fibers.host_parent(id)?;
                self.host.append_child(&parent, &node)?;
                Ok(1)
            }
            Some(EffectTag::Update) => {
                let next = fiber.element.clone();
                let alternate = fiber
                    .alternate
                    .ok_or(RenderError::Invariant("update fiber without an alternate"))?;
                let prev = self.fibers.get(alternate)?.element.clone();
                if prev.ptr_eq(&next) {
                    return Ok(0);
                }
                Ok(update_properties(&mut self.host, &node, prev.props(), next.props())?)
            }
            Some(EffectTag::Deletion) => Err(RenderError::Invariant(
                "deletion-tagged fiber in the work-in-progress tree",
            )),
            None => Ok(0),
        }
    }

    /// Detach listeners below `id`, then unhook its top-most host nodes
    fn commit_deletion(&mut self, id: FiberId) -> RenderResult<usize> {
        let mut mutations = 0;
        for member in self.fibers.subtree(id) {
            let fiber = self.fibers.get(member)?;
            if let Some(node) = fiber.host_node.clone() {
                let element = fiber.element.clone();
                remove_listeners(&mut self.host, &node, element.props())?;
            }
        }

        let parent = self.fibers.host_parent(id)?;
        for node in self.top_host_nodes(id)? {
            self.host.remove_child(&parent, &node)?;
            mutations += 1;
        }
        Ok(mutations)
    }

    fn top_host_nodes(&self, id: FiberId) -> RenderResult<Vec<H::Node>> {
        let fiber = self.fibers.get(id)?;
        if let Some(node) = &fiber.host_node {
            return Ok(vec![node.clone()]);
        }
        let mut nodes = Vec::new();
        for child in self.fibers.children(id) {
            nodes.extend(self.top_host_nodes(child)?);
        }
        Ok(nodes)
    }
}
