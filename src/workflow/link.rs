use super::definition::RawLink;
use super::{LinkId, NodeId};
use crate::error::CompileError;
use ahash::AHashMap;
use itertools::Itertools;
use std::fmt;

/// A directed edge between an output slot and an input slot.
///
/// The effective source starts out equal to the authored source and is rewritten
/// once by the bypass pass when the authored source is a disabled node.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub source_node: NodeId,
    pub source_slot: u32,
    pub dest_node: NodeId,
    pub dest_slot: u32,
    /// Advisory only, never checked.
    pub datatype: String,
    effective_source_node: NodeId,
    effective_source_slot: u32,
}

impl Link {
    pub fn new(
        id: LinkId,
        source: (NodeId, u32),
        dest: (NodeId, u32),
        datatype: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source_node: source.0,
            source_slot: source.1,
            dest_node: dest.0,
            dest_slot: dest.1,
            datatype: datatype.into(),
            effective_source_node: source.0,
            effective_source_slot: source.1,
        }
    }

    pub fn effective_source_node(&self) -> NodeId {
        self.effective_source_node
    }

    pub fn effective_source_slot(&self) -> u32 {
        self.effective_source_slot
    }

    pub fn effective_source(&self) -> (NodeId, u32) {
        (self.effective_source_node, self.effective_source_slot)
    }

    /// Whether bypassing moved the effective source away from the authored one.
    pub fn is_rerouted(&self) -> bool {
        self.effective_source() != (self.source_node, self.source_slot)
    }

    pub(crate) fn set_effective_source(&mut self, node: NodeId, slot: u32) {
        self.effective_source_node = node;
        self.effective_source_slot = slot;
    }
}

impl From<&RawLink> for Link {
    fn from(raw: &RawLink) -> Self {
        Link::new(
            raw.id,
            (raw.source_node, raw.source_slot),
            (raw.dest_node, raw.dest_slot),
            raw.datatype.clone(),
        )
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Link {:4}. {}:{}",
            self.id, self.source_node, self.source_slot
        )?;
        if self.is_rerouted() {
            write!(
                f,
                " ({}:{})",
                self.effective_source_node, self.effective_source_slot
            )?;
        }
        write!(f, " -> {}:{}.", self.dest_node, self.dest_slot)
    }
}

/// Every link of one workflow, keyed by id, with an index on the destination slot.
#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    links: AHashMap<LinkId, Link>,
    // Key: (dest_node, dest_slot). The lowest link id wins if a slot is fed twice.
    by_dest: AHashMap<(NodeId, u32), LinkId>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from the document's raw link array.
    pub fn from_raw(raw_links: &[RawLink]) -> Result<Self, CompileError> {
        let mut table = Self::new();
        for raw in raw_links {
            table.insert(Link::from(raw))?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, link: Link) -> Result<(), CompileError> {
        if self.links.contains_key(&link.id) {
            return Err(CompileError::DuplicateLink(link.id));
        }
        let key = (link.dest_node, link.dest_slot);
        match self.by_dest.get(&key) {
            Some(existing) if *existing < link.id => {}
            _ => {
                self.by_dest.insert(key, link.id);
            }
        }
        tracing::debug!("{}", link);
        self.links.insert(link.id, link);
        Ok(())
    }

    pub fn get(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        self.links.get_mut(&id)
    }

    pub fn contains(&self, id: LinkId) -> bool {
        self.links.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Link ids in ascending order.
    pub fn ids(&self) -> Vec<LinkId> {
        self.links.keys().copied().sorted().collect()
    }

    /// Links in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.values().sorted_by_key(|link| link.id)
    }

    /// The link feeding input `slot` of `node`, if any.
    pub fn find_by_dest(&self, node: NodeId, slot: u32) -> Option<&Link> {
        self.by_dest
            .get(&(node, slot))
            .and_then(|id| self.links.get(id))
    }

    /// The lowest-id link leaving output `slot` of `node`, if any.
    pub fn find_by_source(&self, node: NodeId, slot: u32) -> Option<&Link> {
        self.links
            .values()
            .filter(|link| link.source_node == node && link.source_slot == slot)
            .min_by_key(|link| link.id)
    }
}
