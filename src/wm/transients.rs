//! Transients Module
//!
//! Owner/transient relations. A transient names its owner by window ID; the
//! reverse direction is found by scanning, so nothing dangles when either
//! side goes away. Owner chains from misbehaving clients may form cycles and
//! every walk here is guarded against that.

use crate::wm::registry::ClientRegistry;

/// Clients directly transient for `owner`, in stacking order (top first).
pub fn direct_transients(registry: &ClientRegistry, owner: u32) -> Vec<u32> {
    registry
        .top_down()
        .into_iter()
        .filter(|&w| w != owner && registry.get(w).is_some_and(|c| c.owner == Some(owner)))
        .collect()
}

/// `owner` and everything transitively transient for it. Transients come
/// first, in stacking order, with `owner` last.
pub fn transient_closure(registry: &ClientRegistry, owner: u32) -> Vec<u32> {
    let mut found: Vec<u32> = vec![owner];
    let mut queue: Vec<u32> = vec![owner];
    while let Some(current) = queue.pop() {
        for transient in direct_transients(registry, current) {
            if !found.contains(&transient) {
                found.push(transient);
                queue.push(transient);
            }
        }
    }

    let mut block: Vec<u32> = registry
        .top_down()
        .into_iter()
        .filter(|w| *w != owner && found.contains(w))
        .collect();
    if registry.contains(owner) {
        block.push(owner);
    }
    block
}
