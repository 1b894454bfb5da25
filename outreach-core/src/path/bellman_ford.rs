//! Single-source Bellman-Ford relaxation with negative-cycle recovery.

/// A directed arc of a [`super::RouteGraph`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct DirectedArc {
    pub(super) from: usize,
    pub(super) to: usize,
    pub(super) cost: f64,
}

/// Outcome of a relaxation run.
pub(super) enum Relaxation {
    /// Shortest distances and parent pointers from the origin.
    Converged {
        distances: Vec<f64>,
        parents: Vec<Option<usize>>,
    },
    /// Nodes of a negative cycle reachable from the origin, closed so the
    /// first and last entries match.
    NegativeCycle(Vec<usize>),
}

pub(super) fn relax(node_count: usize, arcs: &[DirectedArc], origin: usize) -> Relaxation {
    let mut distances = vec![f64::INFINITY; node_count];
    let mut parents: Vec<Option<usize>> = vec![None; node_count];
    distances[origin] = 0.0;

    for _ in 1..node_count {
        if !relax_pass(arcs, &mut distances, &mut parents, &mut |_| {}) {
            break;
        }
    }

    let mut heads = Vec::new();
    relax_pass(arcs, &mut distances, &mut parents, &mut |head| heads.push(head));
    if heads.is_empty() {
        return Relaxation::Converged { distances, parents };
    }

    let cycle = heads
        .iter()
        .find_map(|&head| walk_cycle(&parents, head))
        .unwrap_or_default();
    Relaxation::NegativeCycle(cycle)
}

/// Relaxes every arc once, reporting each improved head to `on_improve`.
/// Returns `true` when any distance changed.
fn relax_pass(
    arcs: &[DirectedArc],
    distances: &mut [f64],
    parents: &mut [Option<usize>],
    on_improve: &mut impl FnMut(usize),
) -> bool {
    let mut changed = false;
    for arc in arcs {
        let from = distances[arc.from];
        if !from.is_finite() {
            continue;
        }
        let candidate = from + arc.cost;
        if candidate < distances[arc.to] {
            distances[arc.to] = candidate;
            parents[arc.to] = Some(arc.from);
            on_improve(arc.to);
            changed = true;
        }
    }
    changed
}

/// Steps back `n` parents from `head` so the walk is certain to sit on the
/// cycle, then follows parents until it returns, yielding the cycle in
/// forward order.
fn walk_cycle(parents: &[Option<usize>], head: usize) -> Option<Vec<usize>> {
    let mut start = head;
    for _ in 0..parents.len() {
        start = parents[start]?;
    }

    let mut cycle = vec![start];
    let mut current = parents[start]?;
    while current != start {
        if cycle.len() > parents.len() {
            return None;
        }
        cycle.push(current);
        current = parents[current]?;
    }
    cycle.push(start);
    cycle.reverse();
    Some(cycle)
}

/// Follows parents from `destination` back to `origin`.
pub(super) fn trace_path(
    parents: &[Option<usize>],
    origin: usize,
    destination: usize,
) -> Option<Vec<usize>> {
    let mut nodes = vec![destination];
    let mut current = destination;
    while current != origin {
        if nodes.len() > parents.len() {
            return None;
        }
        current = parents[current]?;
        nodes.push(current);
    }
    nodes.reverse();
    Some(nodes)
}
