//! Point quadtree over layout-space positions.
//!
//! Rebuilt from scratch for every snapshot and every surface resize. Leaves
//! split once they hold more than `max_items_per_node` items unless they sit
//! at `max_depth`, where they keep growing. That bounds the tree for
//! coincident input at the cost of a linear scan inside the over-full leaf.

use petri_core::config::IndexConfig;

use crate::geometry::{Point, Rect};

/// An indexed point: its layout position and its index in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadItem {
    pub index: usize,
    pub position: Point,
}

#[derive(Debug, Clone)]
pub struct Quadtree {
    root: QuadNode,
    max_items: usize,
    max_depth: u32,
    len: usize,
}

#[derive(Debug, Clone)]
struct QuadNode {
    bounds: Rect,
    depth: u32,
    items: Vec<QuadItem>,
    /// NW, NE, SW, SE once subdivided.
    children: Option<Box<[QuadNode; 4]>>,
}

impl Quadtree {
    pub fn new(bounds: Rect, config: &IndexConfig) -> Self {
        Self {
            root: QuadNode::leaf(bounds, 0),
            max_items: config.max_items_per_node.max(1),
            max_depth: config.max_depth,
            len: 0,
        }
    }

    /// Build a tree from `(index, position)` pairs, skipping out-of-bounds points.
    pub fn build<I>(bounds: Rect, config: &IndexConfig, points: I) -> Self
    where
        I: IntoIterator<Item = (usize, Point)>,
    {
        let mut tree = Self::new(bounds, config);
        for (index, position) in points {
            tree.insert(QuadItem { index, position });
        }
        tree
    }

    /// Insert a point. Points outside the root bounds are not indexed and
    /// `false` is returned.
    pub fn insert(&mut self, item: QuadItem) -> bool {
        if !item.position.is_finite() || !self.root.bounds.contains(item.position) {
            tracing::debug!(
                index = item.index,
                x = item.position.x,
                y = item.position.y,
                "point outside index bounds, skipped"
            );
            return false;
        }
        self.root.insert(item, self.max_items, self.max_depth);
        self.len += 1;
        true
    }

    /// Candidate items from every leaf whose box intersects the circle.
    /// Items are not filtered by their exact distance.
    pub fn query_radius(&self, center: Point, radius: f64) -> Vec<QuadItem> {
        let mut out = Vec::new();
        if center.is_finite() && radius.is_finite() && radius >= 0.0 {
            self.root.collect(center, radius, &mut out);
        }
        out
    }

    pub fn clear(&mut self) {
        self.root = QuadNode::leaf(self.root.bounds, 0);
        self.len = 0;
    }

    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Depth of the deepest node; a lone root has depth 0.
    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

impl QuadNode {
    fn leaf(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    fn quadrant_of(&self, p: Point) -> usize {
        let c = self.bounds.center();
        let east = usize::from(p.x >= c.x);
        let south = usize::from(p.y >= c.y);
        south * 2 + east
    }

    fn insert(&mut self, item: QuadItem, max_items: usize, max_depth: u32) {
        let q = self.quadrant_of(item.position);
        if let Some(children) = self.children.as_mut() {
            children[q].insert(item, max_items, max_depth);
            return;
        }
        self.items.push(item);
        if self.items.len() > max_items && self.depth < max_depth {
            self.subdivide(max_items, max_depth);
        }
    }

    fn subdivide(&mut self, max_items: usize, max_depth: u32) {
        let depth = self.depth + 1;
        let mut children = Box::new(self.bounds.quadrants().map(|b| QuadNode::leaf(b, depth)));
        for item in std::mem::take(&mut self.items) {
            let q = self.quadrant_of(item.position);
            children[q].insert(item, max_items, max_depth);
        }
        self.children = Some(children);
    }

    fn collect(&self, center: Point, radius: f64, out: &mut Vec<QuadItem>) {
        if !self.bounds.intersects_circle(center, radius) {
            return;
        }
        match &self.children {
            Some(children) => {
                for child in children.iter() {
                    child.collect(center, radius, out);
                }
            }
            None => out.extend_from_slice(&self.items),
        }
    }

    fn max_depth(&self) -> u32 {
        match &self.children {
            Some(children) => children
                .iter()
                .map(QuadNode::max_depth)
                .max()
                .unwrap_or(self.depth),
            None => self.depth,
        }
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map(|c| c.iter().map(QuadNode::node_count).sum::<usize>())
            .unwrap_or(0)
    }
}
