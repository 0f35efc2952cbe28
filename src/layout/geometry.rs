//! Cluster geometry.
//!
//! Every cluster is drawn as a cone segment: a top disc sized by its member
//! count and a base disc wide enough to carry its descendants. Sizes are
//! computed bottom-up so that each cluster sees its descendants' final
//! volumes and extents.
//!
//! ## Descendant arrangement
//!
//! With two or more descendants, at most one sits on the axis (the uniquely
//! largest, else the uniquely smallest) and the rest are spread evenly on
//! the rim. The rim order alternates between the largest and smallest
//! remaining descendants so that large subtrees do not end up side by side.

use std::f64::consts::PI;

use crate::config::LayoutConfig;
use crate::types::{ClusterId, Position, SlotTable};

use super::Layout;

/// Extent and volume of one descendant, as seen by its ancestor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildGeometry {
    /// Subtree volume.
    pub volume: f64,
    /// Subtree horizontal extent.
    pub size: f64,
}

/// Placement of a cluster's descendants.
#[derive(Debug, Clone, PartialEq)]
pub struct DescendantArrangement {
    /// Indices into the input, ordered by ascending volume.
    pub order: Vec<usize>,
    /// Index of the descendant drawn on the axis, if any.
    pub centered: Option<usize>,
    /// `(index, degrees)` for every rim descendant, in placement order.
    pub rim: Vec<(usize, f64)>,
    /// Base radius needed to carry the arrangement.
    pub base_radius: f64,
}

/// Arrange two or more descendants around an ancestor's axis.
///
/// Descendants with equal volumes keep their input order, which makes the
/// arrangement stable when fed its own `order` again.
pub fn arrange_descendants(children: &[ChildGeometry], config: &LayoutConfig) -> DescendantArrangement {
    let mut order: Vec<usize> = (0..children.len()).collect();
    order.sort_by(|a, b| children[*a].volume.total_cmp(&children[*b].volume));

    let n = order.len();
    let volume = |k: usize| children[order[k]].volume;

    let centered_pos = if n < 2 {
        None
    } else if relative_gap(volume(n - 1), volume(n - 2)) > config.volume_tolerance {
        Some(n - 1)
    } else if relative_gap(volume(1), volume(0)) > config.volume_tolerance {
        Some(0)
    } else {
        None
    };

    let centered = centered_pos.map(|k| order[k]);
    let rim_members: Vec<usize> = order
        .iter()
        .enumerate()
        .filter(|(k, _)| Some(*k) != centered_pos)
        .map(|(_, i)| *i)
        .collect();

    // The largest rim member by volume sets the rim spacing.
    let rim_size = rim_members.last().map(|i| children[*i].size).unwrap_or(0.0);
    let center_size = centered.map(|i| children[i].size).unwrap_or(0.0);

    let k = rim_members.len();
    let min_rim_radius = if k > 1 { rim_size / (PI / k as f64).sin() } else { 0.0 };
    let base_radius = (center_size + rim_size + config.rim_gap).max(min_rim_radius);

    DescendantArrangement {
        order,
        centered,
        rim: interleave(&rim_members),
        base_radius,
    }
}

/// Evenly spaced rim angles, alternating largest and smallest remaining.
///
/// Largest picks take even angle indices, smallest picks odd ones.
fn interleave(rim: &[usize]) -> Vec<(usize, f64)> {
    let k = rim.len();
    if k == 0 {
        return Vec::new();
    }
    let step = 360.0 / k as f64;

    let mut placed = Vec::with_capacity(k);
    let (mut lo, mut hi) = (0, k);
    let (mut even, mut odd) = (0usize, 1usize);
    let mut take_large = true;

    while lo < hi {
        if take_large {
            hi -= 1;
            placed.push((rim[hi], even as f64 * step));
            even += 2;
        } else {
            placed.push((rim[lo], odd as f64 * step));
            lo += 1;
            odd += 2;
        }
        take_large = !take_large;
    }
    placed
}

fn relative_gap(larger: f64, smaller: f64) -> f64 {
    if larger > 0.0 {
        (larger - smaller) / larger
    } else {
        0.0
    }
}

/// Volume of a truncated cone.
pub fn frustum_volume(top_radius: f64, base_radius: f64, height: f64) -> f64 {
    PI * height / 3.0
        * (top_radius * top_radius + top_radius * base_radius + base_radius * base_radius)
}

/// Volume of a sphere.
pub fn sphere_volume(radius: f64) -> f64 {
    4.0 / 3.0 * PI * radius.powi(3)
}

/// Size every cluster and place its descendants, deepest rank first.
pub(crate) fn compute_geometry(layout: &mut Layout, config: &LayoutConfig) {
    for rank in (0..layout.clusters_in_rank.len()).rev() {
        let clusters = layout.clusters_in_rank[rank].clone();
        for cluster in clusters {
            size_cluster(layout, cluster, config);
        }
    }

    tracing::debug!(
        clusters = layout.clusters.len(),
        root_size = layout.clusters_in_rank.first()
            .and_then(|r| r.first())
            .map(|c| layout.clusters[c.index()].size)
            .unwrap_or(0.0),
        "Computed cluster geometry"
    );
}

fn size_cluster(layout: &mut Layout, id: ClusterId, config: &LayoutConfig) {
    let top_radius = config.top_radius(layout.clusters[id.index()].num_states());
    let descendants = layout.clusters[id.index()].descendants.clone();
    let children: Vec<ChildGeometry> = descendants
        .iter()
        .map(|d| {
            let c = &layout.clusters[d.index()];
            ChildGeometry { volume: c.volume, size: c.size }
        })
        .collect();

    let (base_radius, size, volume) = match descendants.as_slice() {
        [] => (top_radius, top_radius, sphere_volume(top_radius)),
        [only] => {
            let child = &layout.clusters[only.index()];
            let base_radius = child.top_radius;
            let size = top_radius.max(child.size);
            let volume = frustum_volume(top_radius, base_radius, config.cone_height) + child.volume;
            layout.clusters[only.index()].position = Position::Centered;
            (base_radius, size, volume)
        }
        _ => {
            let arrangement = arrange_descendants(&children, config);

            if let Some(i) = arrangement.centered {
                layout.clusters[descendants[i].index()].position = Position::Centered;
            }
            for &(i, degrees) in &arrangement.rim {
                layout.clusters[descendants[i].index()].position = Position::angle(degrees);
            }

            let base_radius = arrangement.base_radius;
            let size = top_radius.max(base_radius);
            let volume = frustum_volume(top_radius, base_radius, config.cone_height)
                + arrangement.order.iter().map(|i| children[*i].volume).sum::<f64>();

            layout.clusters[id.index()].descendants =
                arrangement.order.iter().map(|i| descendants[*i]).collect();
            (base_radius, size, volume)
        }
    };

    let cluster = &mut layout.clusters[id.index()];
    cluster.top_radius = top_radius;
    cluster.base_radius = base_radius;
    cluster.size = size;
    cluster.volume = volume;
    cluster.slots = SlotTable::for_rim(top_radius, config.state_radius, cluster.states.len());
}
