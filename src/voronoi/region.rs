//! Clipped cell polygons for individual sites

use super::edge::{Edge, Side};
use super::vertex::Vertex;
use crate::geometry::{signed_double_area, Point, Rect, BOUNDARY_EPSILON};

const CLOSE_ENOUGH: f64 = 0.005;

const TOP: u8 = 1;
const BOTTOM: u8 = 2;
const LEFT: u8 = 4;
const RIGHT: u8 = 8;

/// Which rectangle sides `p` lies on, as a bit set
fn bounds_check(p: Point, bounds: &Rect) -> u8 {
    let mut value = 0;
    if (p.x - bounds.left()).abs() <= BOUNDARY_EPSILON {
        value |= LEFT;
    }
    if (p.x - bounds.right()).abs() <= BOUNDARY_EPSILON {
        value |= RIGHT;
    }
    if (p.y - bounds.top()).abs() <= BOUNDARY_EPSILON {
        value |= TOP;
    }
    if (p.y - bounds.bottom()).abs() <= BOUNDARY_EPSILON {
        value |= BOTTOM;
    }
    value
}

/// Chain a site's edges end to end through shared vertices
///
/// Unbounded ends (no vertex) match each other, which links the two hull rays
/// of a hull site.
fn reorder(site_edges: &[usize], edges: &[Edge]) -> Vec<(usize, Side)> {
    let Some((&first, rest)) = site_edges.split_first() else {
        return Vec::new();
    };
    let mut chain = std::collections::VecDeque::with_capacity(site_edges.len());
    chain.push_back((first, Side::Left));
    let mut first_point = edges[first].vertex(Side::Left);
    let mut last_point = edges[first].vertex(Side::Right);

    let mut pending: Vec<usize> = rest.to_vec();
    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|&e| {
            let left = edges[e].vertex(Side::Left);
            let right = edges[e].vertex(Side::Right);
            if left == last_point {
                last_point = right;
                chain.push_back((e, Side::Left));
            } else if right == first_point {
                first_point = left;
                chain.push_front((e, Side::Left));
            } else if left == first_point {
                first_point = right;
                chain.push_front((e, Side::Right));
            } else if right == last_point {
                last_point = left;
                chain.push_back((e, Side::Right));
            } else {
                return true;
            }
            false
        });
        if pending.len() == before {
            break;
        }
    }
    chain.into_iter().collect()
}

/// Close the gap between the last point and the start of `(edge, side)`,
/// walking around the rectangle corners where needed
fn connect(points: &mut Vec<Point>, edge: &Edge, side: Side, bounds: &Rect, closing_up: bool) {
    let Some(&right_point) = points.last() else {
        return;
    };
    let (Some(new_point), Some(new_right_point)) =
        (edge.clipped_end(side), edge.clipped_end(side.other()))
    else {
        return;
    };

    if right_point.distance(new_point) >= CLOSE_ENOUGH {
        let same_x = (right_point.x - new_point.x).abs() <= BOUNDARY_EPSILON;
        let same_y = (right_point.y - new_point.y).abs() <= BOUNDARY_EPSILON;
        if !same_x && !same_y {
            let right_check = bounds_check(right_point, bounds);
            let new_check = bounds_check(new_point, bounds);
            let half_height = right_point.y - bounds.y + new_point.y - bounds.y < bounds.height;
            let half_width = right_point.x - bounds.x + new_point.x - bounds.x < bounds.width;

            if right_check & RIGHT != 0 {
                let px = bounds.right();
                if new_check & BOTTOM != 0 {
                    points.push(Point::new(px, bounds.bottom()));
                } else if new_check & TOP != 0 {
                    points.push(Point::new(px, bounds.top()));
                } else if new_check & LEFT != 0 {
                    let py = if half_height { bounds.top() } else { bounds.bottom() };
                    points.push(Point::new(px, py));
                    points.push(Point::new(bounds.left(), py));
                }
            } else if right_check & LEFT != 0 {
                let px = bounds.left();
                if new_check & BOTTOM != 0 {
                    points.push(Point::new(px, bounds.bottom()));
                } else if new_check & TOP != 0 {
                    points.push(Point::new(px, bounds.top()));
                } else if new_check & RIGHT != 0 {
                    let py = if half_height { bounds.top() } else { bounds.bottom() };
                    points.push(Point::new(px, py));
                    points.push(Point::new(bounds.right(), py));
                }
            } else if right_check & TOP != 0 {
                let py = bounds.top();
                if new_check & RIGHT != 0 {
                    points.push(Point::new(bounds.right(), py));
                } else if new_check & LEFT != 0 {
                    points.push(Point::new(bounds.left(), py));
                } else if new_check & BOTTOM != 0 {
                    let px = if half_width { bounds.left() } else { bounds.right() };
                    points.push(Point::new(px, py));
                    points.push(Point::new(px, bounds.bottom()));
                }
            } else if right_check & BOTTOM != 0 {
                let py = bounds.bottom();
                if new_check & RIGHT != 0 {
                    points.push(Point::new(bounds.right(), py));
                } else if new_check & LEFT != 0 {
                    points.push(Point::new(bounds.left(), py));
                } else if new_check & TOP != 0 {
                    let px = if half_width { bounds.left() } else { bounds.right() };
                    points.push(Point::new(px, py));
                    points.push(Point::new(px, bounds.top()));
                }
            }
        }
        if closing_up {
            return;
        }
        points.push(new_point);
    }
    if closing_up {
        return;
    }
    if points[0].distance(new_right_point) >= CLOSE_ENOUGH {
        points.push(new_right_point);
    }
}

/// Polygon of one site's cell, clipped to `bounds` and wound counter-clockwise
pub(crate) fn site_region(
    site_edges: &[usize],
    edges: &[Edge],
    bounds: &Rect,
) -> Vec<Point> {
    let chain = reorder(site_edges, edges);
    let mut visible = chain
        .iter()
        .filter(|(e, _)| edges[*e].is_visible())
        .map(|&(e, side)| (&edges[e], side));

    let Some((first_edge, first_side)) = visible.next() else {
        return Vec::new();
    };
    let (Some(start), Some(end)) = (
        first_edge.clipped_end(first_side),
        first_edge.clipped_end(first_side.other()),
    ) else {
        return Vec::new();
    };

    let mut points = vec![start, end];
    for (edge, side) in visible {
        connect(&mut points, edge, side, bounds, false);
    }
    connect(&mut points, first_edge, first_side, bounds, true);

    if signed_double_area(&points) < 0.0 {
        points.reverse();
    }
    points
}

/// Vertex-average of a region, used as the relaxation target
pub(crate) fn region_average(region: &[Point]) -> Option<Point> {
    if region.is_empty() {
        return None;
    }
    let sum: Point = region.iter().copied().sum();
    Some(sum / region.len() as f64)
}

/// Resolved coordinate of a vertex candidate
#[inline]
pub(crate) fn vertex_coord(vertices: &[Vertex], id: usize) -> Point {
    vertices[id].coord
}
