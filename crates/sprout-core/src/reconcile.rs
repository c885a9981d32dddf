//! Child reconciliation
//!
//! Builds a work-in-progress fiber's child list from the new child elements
//! and the alternate's old children. Which old fiber an element may reuse is
//! decided by a [`MatchStrategy`].

use std::fmt;

use crate::fiber::FiberTree;
use crate::{EffectTag, Element, Fiber, FiberId, FiberKind, RenderError};

/// Pairing of old children with new elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    /// One entry per new element: the old child index it updates, or `None`
    /// for a fresh placement
    pub slots: Vec<Option<usize>>,
    /// Old child indices that have no counterpart
    pub deleted: Vec<usize>,
}

/// Decides which old child each new element corresponds to
pub trait MatchStrategy: fmt::Debug {
    fn pair(&self, old: &[&FiberKind], new: &[Element]) -> Matching;
}

/// Index-by-index matching.
///
/// Children pair up by position only. Inserting or removing near the front of
/// a list makes every following child look changed, and two same-kind
/// siblings that swap places are both treated as updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Positional;

impl MatchStrategy for Positional {
    fn pair(&self, old: &[&FiberKind], new: &[Element]) -> Matching {
        let mut matching = Matching::default();
        for index in 0..old.len().max(new.len()) {
            match (old.get(index), new.get(index)) {
                (Some(kind), Some(element)) if kind.matches(element.kind()) => {
                    matching.slots.push(Some(index));
                }
                (old_kind, element) => {
                    if element.is_some() {
                        matching.slots.push(None);
                    }
                    if old_kind.is_some() {
                        matching.deleted.push(index);
                    }
                }
            }
        }
        matching
    }
}

/// Rebuild `wip`'s child list from `elements`.
///
/// Superseded old children are tagged [`EffectTag::Deletion`] and appended to
/// `deletions`.
pub(crate) fn reconcile_children<N: Clone>(
    tree: &mut FiberTree<N>,
    strategy: &dyn MatchStrategy,
    wip: FiberId,
    elements: &[Element],
    deletions: &mut Vec<FiberId>,
) -> Result<(), RenderError> {
    let old_children = match tree.get(wip)?.alternate {
        Some(alternate) => tree.children(alternate),
        None => Vec::new(),
    };
    let matching = {
        let kinds = old_children
            .iter()
            .map(|id| tree.get(*id).map(|f| &f.kind))
            .collect::<Result<Vec<_>, _>>()?;
        strategy.pair(&kinds, elements)
    };

    if matching.slots.len() != elements.len() {
        tracing::error!(
            "Match strategy produced {} slots for {} elements",
            matching.slots.len(),
            elements.len()
        );
        return Err(RenderError::Invariant("match strategy slot count differs from element count"));
    }

    let mut prev_sibling: Option<FiberId> = None;
    let mut first_child: Option<FiberId> = None;
    for (element, slot) in elements.iter().zip(&matching.slots) {
        let mut fiber = Fiber::new(FiberKind::from_element(element.kind()), element.clone());
        fiber.parent = Some(wip);
        match slot {
            Some(index) => {
                let old_id = *old_children
                    .get(*index)
                    .ok_or(RenderError::Invariant(
                        "match strategy referenced a missing old child",
                    ))?;
                fiber.host_node = tree.get(old_id)?.host_node.clone();
                fiber.alternate = Some(old_id);
                fiber.effect_tag = Some(EffectTag::Update);
            }
            None => fiber.effect_tag = Some(EffectTag::Placement),
        }

        let id = tree.insert(fiber);
        match prev_sibling {
            Some(prev) => tree.get_mut(prev)?.sibling = Some(id),
            None => first_child = Some(id),
        }
        prev_sibling = Some(id);
    }
    tree.get_mut(wip)?.child = first_child;

    for index in &matching.deleted {
        let old_id = *old_children
            .get(*index)
            .ok_or(RenderError::Invariant("match strategy deleted a missing old child"))?;
        tree.get_mut(old_id)?.effect_tag = Some(EffectTag::Deletion);
        deletions.push(old_id);
    }

    tracing::trace!(
        "Reconciled {} children of {}: {} reused, {} deleted",
        elements.len(),
        wip,
        matching.slots.iter().flatten().count(),
        matching.deleted.len()
    );
    Ok(())
}
