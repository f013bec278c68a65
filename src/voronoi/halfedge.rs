//! Beach-line nodes

use super::edge::{Edge, Side};
use super::site::Site;
use crate::geometry::Point;

/// A node of the ordered beach-line list
///
/// `left`/`right` link the edge list, `next_in_queue` links the bucket of the
/// circle-event queue. A halfedge without an edge is one of the two list ends.
#[derive(Debug, Clone)]
pub(crate) struct Halfedge {
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub next_in_queue: Option<usize>,
    pub edge: Option<usize>,
    pub deleted: bool,
    pub orientation: Side,
    pub vertex: Option<usize>,
    pub ystar: f64,
}

impl Halfedge {
    pub(crate) fn new(edge: Option<usize>, orientation: Side) -> Self {
        Self {
            left: None,
            right: None,
            next_in_queue: None,
            edge,
            deleted: false,
            orientation,
            vertex: None,
            ystar: 0.0,
        }
    }

    /// Whether `p` lies to the left of this halfedge's breakpoint
    pub(crate) fn is_left_of(&self, p: Point, edge: &Edge, sites: &[Site]) -> bool {
        let top_site = sites[edge.site(Side::Right)].coord;
        let right_of_site = p.x > top_site.x;
        if right_of_site && self.orientation == Side::Left {
            return true;
        }
        if !right_of_site && self.orientation == Side::Right {
            return false;
        }

        let above = if edge.is_x_normalized() {
            let dyp = p.y - top_site.y;
            let dxp = p.x - top_site.x;
            let mut fast = false;
            let mut above;
            if (!right_of_site && edge.b < 0.0) || (right_of_site && edge.b >= 0.0) {
                above = dyp >= edge.b * dxp;
                fast = above;
            } else {
                above = p.x + p.y * edge.b > edge.c;
                if edge.b < 0.0 {
                    above = !above;
                }
                if !above {
                    fast = true;
                }
            }
            if !fast {
                let dxs = top_site.x - sites[edge.site(Side::Left)].coord.x;
                above = edge.b * (dxp * dxp - dyp * dyp)
                    < dxs * dyp * (1.0 + 2.0 * dxp / dxs + edge.b * edge.b);
                if edge.b < 0.0 {
                    above = !above;
                }
            }
            above
        } else {
            let yl = edge.c - edge.a * p.x;
            let t1 = p.y - yl;
            let t2 = p.x - top_site.x;
            let t3 = yl - top_site.y;
            t1 * t1 > t2 * t2 + t3 * t3
        };

        match self.orientation {
            Side::Left => above,
            Side::Right => !above,
        }
    }
}
