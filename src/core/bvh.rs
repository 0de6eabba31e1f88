// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray3f;

const SAH_BUCKETS: usize = 12;

#[derive(Clone)]
struct BVHNode {
    bounds: AABB,
    children: Option<(usize, usize)>,
    start: usize,
    count: usize,
}

impl BVHNode {
    fn leaf(bounds: AABB, start: usize, count: usize) -> Self {
        Self { bounds, children: None, start, count }
    }

    fn interior(bounds: AABB, left: usize, right: usize) -> Self {
        Self { bounds, children: Some((left, right)), start: 0, count: 0 }
    }
}

/// Bounding volume hierarchy over primitive bounds. It never sees the
/// primitives themselves; hits are resolved through a callback.
pub struct BVH {
    nodes: Vec<BVHNode>,
    indices: Vec<usize>,
    prim_bounds: Vec<AABB>,
    prim_centroids: Vec<Vector3f>,
    max_leaf_size: usize,
}

impl BVH {
    pub fn new(prim_bounds: Vec<AABB>, prim_centroids: Vec<Vector3f>) -> Self {
        Self::with_max_leaf_size(prim_bounds, prim_centroids, 4)
    }

    pub fn with_max_leaf_size(
        prim_bounds: Vec<AABB>,
        prim_centroids: Vec<Vector3f>,
        max_leaf_size: usize,
    ) -> Self {
        let mut bvh = Self {
            indices: (0..prim_bounds.len()).collect(),
            nodes: Vec::new(),
            prim_bounds,
            prim_centroids,
            max_leaf_size: max_leaf_size.max(1),
        };

        if !bvh.indices.is_empty() {
            let (bounds, centroid_bounds) = bvh.compute_bounds(0, bvh.indices.len());
            bvh.build(0, bvh.indices.len(), bounds, centroid_bounds);
        }

        log::debug!("BVH: {} primitives, {} nodes.", bvh.indices.len(), bvh.nodes.len());
        bvh
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Closest hit among the primitives the callback accepts. The callback
    /// returns the hit payload together with its parametric distance.
    pub fn ray_intersection<F, T>(&self, ray: &Ray3f, mut hit_fn: F) -> Option<(usize, T)>
    where
        F: FnMut(usize, &Ray3f) -> Option<(T, Float)>,
    {
        if self.nodes.is_empty() {
            return None;
        }

        let mut closest: Option<(usize, T)> = None;
        let mut segment = *ray;
        let mut stack = vec![0usize];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if !node.bounds.ray_intersect(&segment) {
                continue;
            }

            match node.children {
                None => {
                    for i in 0..node.count {
                        let prim_idx = self.indices[node.start + i];
                        if let Some((hit, t)) = hit_fn(prim_idx, ray) {
                            // Shrinking the segment culls every farther node.
                            if segment.update(t) {
                                closest = Some((prim_idx, hit));
                            }
                        }
                    }
                }
                Some((left, right)) => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        closest
    }

    fn bucket_of(&self, prim_idx: usize, axis: usize, centroid_bounds: &AABB) -> usize {
        let axis_min = centroid_bounds.p_min[axis];
        let extent = centroid_bounds.p_max[axis] - axis_min;
        let c = self.prim_centroids[prim_idx][axis];
        let b = ((c - axis_min) / extent * SAH_BUCKETS as Float) as usize;
        b.min(SAH_BUCKETS - 1)
    }

    fn push_leaf(&mut self, bounds: AABB, start: usize, count: usize) -> usize {
        let node_idx = self.nodes.len();
        self.nodes.push(BVHNode::leaf(bounds, start, count));
        node_idx
    }

    fn build(&mut self, start: usize, end: usize, bounds: AABB, centroid_bounds: AABB) -> usize {
        let count = end - start;
        if count <= self.max_leaf_size {
            return self.push_leaf(bounds, start, count);
        }

        let axis = centroid_bounds.max_extent();
        if centroid_bounds.diagonal()[axis].abs() < 1e-6 {
            // All centroids coincide, nothing to split on.
            return self.push_leaf(bounds, start, count);
        }

        // SAH with fixed buckets along the split axis.
        let mut buckets = vec![(0usize, AABB::default()); SAH_BUCKETS];
        for i in start..end {
            let idx = self.indices[i];
            let b = self.bucket_of(idx, axis, &centroid_bounds);
            buckets[b].0 += 1;
            buckets[b].1.expand_by_aabb(&self.prim_bounds[idx]);
        }

        let area = bounds.surface_area().max(1e-6);
        let mut min_cost = Float::MAX;
        let mut min_split = 0usize;
        for split in 0..(SAH_BUCKETS - 1) {
            let mut cost = 1.0;
            for (range_start, range_end) in [(0, split + 1), (split + 1, SAH_BUCKETS)].iter() {
                let mut side = AABB::default();
                let mut side_count = 0usize;
                for bucket in &buckets[*range_start..*range_end] {
                    side_count += bucket.0;
                    side.expand_by_aabb(&bucket.1);
                }
                if side_count > 0 {
                    cost += (side_count as Float) * side.surface_area() / area;
                }
            }
            if cost < min_cost {
                min_cost = cost;
                min_split = split;
            }
        }

        if min_cost >= count as Float {
            return self.push_leaf(bounds, start, count);
        }

        // Partition indices in-place by bucket.
        let mut mid = start;
        for i in start..end {
            let idx = self.indices[i];
            if self.bucket_of(idx, axis, &centroid_bounds) <= min_split {
                self.indices.swap(i, mid);
                mid += 1;
            }
        }

        if mid == start || mid == end {
            return self.push_leaf(bounds, start, count);
        }

        let (left_bounds, left_centroids) = self.compute_bounds(start, mid);
        let (right_bounds, right_centroids) = self.compute_bounds(mid, end);
        let node_idx = self.push_leaf(bounds, 0, 0);
        let left = self.build(start, mid, left_bounds, left_centroids);
        let right = self.build(mid, end, right_bounds, right_centroids);
        self.nodes[node_idx] = BVHNode::interior(bounds, left, right);
        node_idx
    }

    fn compute_bounds(&self, start: usize, end: usize) -> (AABB, AABB) {
        let mut bounds = AABB::default();
        let mut centroid_bounds = AABB::default();
        for &idx in &self.indices[start..end] {
            bounds.expand_by_aabb(&self.prim_bounds[idx]);
            centroid_bounds.expand_by_point(&self.prim_centroids[idx]);
        }
        (bounds, centroid_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::BVH;
    use crate::core::shape::Shape;
    use crate::math::constants::{Float, Vector3f};
    use crate::math::ray::Ray3f;
    use crate::math::transform::Transform;
    use crate::shapes::disc::Disc;

    fn build_discs() -> Vec<Disc> {
        (0..16).map(|i| {
            let x = (i % 8) as Float * 2.0;
            let z = (i / 8) as Float * -3.0;
            Disc::new(Transform::from_trs(Vector3f::new(x, 0.0, z), Vector3f::zeros(), Vector3f::repeat(1.0)))
        }).collect()
    }

    fn closest(bvh: &BVH, discs: &[Disc], ray: &Ray3f) -> Option<(usize, Float)> {
        bvh.ray_intersection(ray, |prim_idx, ray| {
            discs[prim_idx].ray_intersection(ray).map(|h| (h.t(), h.t()))
        })
    }

    #[test]
    fn test_bvh_vs_naive_discs() {
        let discs = build_discs();
        let bounds: Vec<_> = discs.iter().map(|d| d.bounding_box()).collect();
        let centroids = bounds.iter().map(|b| b.center()).collect();
        let bvh = BVH::with_max_leaf_size(bounds, centroids, 1);
        assert!(bvh.node_count() > 1);

        for i in 0..8 {
            let origin = Vector3f::new(i as Float * 2.0 + 0.1, 0.1, 1.0);
            let ray = Ray3f::new(origin, Vector3f::new(0.0, 0.0, -1.0), None, None);

            let mut naive: Option<(usize, Float)> = None;
            for (idx, disc) in discs.iter().enumerate() {
                if let Some(hit) = disc.ray_intersection(&ray) {
                    if naive.map_or(true, |(_, t)| hit.t() < t) {
                        naive = Some((idx, hit.t()));
                    }
                }
            }

            let (bvh_idx, bvh_t) = closest(&bvh, &discs, &ray).expect("BVH miss");
            let (naive_idx, naive_t) = naive.expect("naive miss");
            assert_eq!(bvh_idx, naive_idx);
            assert!((bvh_t - naive_t).abs() < 1e-5);
        }

        let miss_ray = Ray3f::new(Vector3f::new(100.0, 100.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        assert!(closest(&bvh, &discs, &miss_ray).is_none());
    }

    #[test]
    fn test_empty_bvh() {
        let bvh = BVH::new(Vec::new(), Vec::new());
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::z(), None, None);
        let hit: Option<(usize, Float)> = bvh.ray_intersection(&ray, |_, _| Some((0.0, 0.0)));
        assert!(hit.is_none());
    }
}
