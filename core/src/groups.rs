use crate::layout::PieceId;

/// Disjoint sets over piece ids with a locked flag per set.
///
/// Union by size with path halving; each root also keeps its member list so
/// rigid operations touch only the cluster instead of scanning every piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupEngine {
    parent: Vec<PieceId>,
    members: Vec<Vec<PieceId>>,
    locked: Vec<bool>,
}

impl GroupEngine {
    pub fn new(total: usize) -> Self {
        Self {
            parent: (0..total).collect(),
            members: (0..total).map(|id| vec![id]).collect(),
            locked: vec![false; total],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn contains(&self, id: PieceId) -> bool {
        id < self.parent.len()
    }

    /// Representative of the set containing `id`, compressing the path.
    pub fn find(&mut self, mut id: PieceId) -> PieceId {
        while self.parent[id] != id {
            let grand = self.parent[self.parent[id]];
            self.parent[id] = grand;
            id = grand;
        }
        id
    }

    /// Representative without touching the structure.
    pub fn root(&self, mut id: PieceId) -> PieceId {
        while self.parent[id] != id {
            id = self.parent[id];
        }
        id
    }

    pub fn same_group(&self, a: PieceId, b: PieceId) -> bool {
        self.root(a) == self.root(b)
    }

    /// Merges the sets of `a` and `b` and returns the surviving root.
    ///
    /// The merged set is locked if either side was; callers only merge a
    /// locked set with one they have already moved into its frame.
    pub fn union(&mut self, a: PieceId, b: PieceId) -> PieceId {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        let (keep, absorb) = if self.members[ra].len() >= self.members[rb].len() {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[absorb] = keep;
        let moved = std::mem::take(&mut self.members[absorb]);
        self.members[keep].extend(moved);
        self.locked[keep] = self.locked[keep] || self.locked[absorb];
        self.locked[absorb] = false;
        keep
    }

    /// Members of the set containing `id`, in merge order.
    pub fn members(&self, id: PieceId) -> &[PieceId] {
        &self.members[self.root(id)]
    }

    pub fn group_size(&self, id: PieceId) -> usize {
        self.members(id).len()
    }

    pub fn is_locked(&self, id: PieceId) -> bool {
        self.locked[self.root(id)]
    }

    /// Locks the set containing `id`. There is no unlock.
    pub fn lock(&mut self, id: PieceId) {
        let root = self.find(id);
        self.locked[root] = true;
    }

    pub fn roots(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.parent
            .iter()
            .enumerate()
            .filter(|(id, parent)| *id == **parent)
            .map(|(id, _)| id)
    }

    pub fn group_count(&self) -> usize {
        self.roots().count()
    }

    /// Sets as sorted member lists, ordered by smallest member.
    pub fn partition(&self) -> Vec<Vec<PieceId>> {
        let mut groups: Vec<Vec<PieceId>> = self
            .roots()
            .map(|root| {
                let mut members = self.members[root].clone();
                members.sort_unstable();
                members
            })
            .collect();
        groups.sort_unstable_by_key(|group| group[0]);
        groups
    }
}
