// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Enumerates all maximal cliques of an undirected graph given as a
/// symmetric adjacency matrix.
///
/// Bron-Kerbosch with pivoting; the graphs here have tens of nodes, so no
/// degeneracy ordering is needed. Members of each clique are returned in
/// ascending node order and the enumeration is deterministic.
pub fn maximal_cliques(adjacency: &[Vec<bool>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    debug_assert!(adjacency.iter().all(|row| row.len() == n));

    let mut cliques = Vec::new();
    let mut current = Vec::new();
    let candidates: Vec<usize> = (0..n).collect();
    let excluded = Vec::new();
    expand(adjacency, &mut current, candidates, excluded, &mut cliques);
    for clique in &mut cliques {
        clique.sort_unstable();
    }
    cliques.sort();
    cliques
}

fn expand(
    adjacency: &[Vec<bool>],
    current: &mut Vec<usize>,
    candidates: Vec<usize>,
    excluded: Vec<usize>,
    cliques: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() && excluded.is_empty() {
        cliques.push(current.clone());
        return;
    }

    // Pivot on the vertex covering the most candidates; only candidates
    // outside the pivot's neighborhood need to be branched on.
    let pivot = candidates
        .iter()
        .chain(&excluded)
        .copied()
        .max_by_key(|&u| candidates.iter().filter(|&&v| adjacency[u][v]).count());
    let branch: Vec<usize> = match pivot {
        Some(u) => candidates
            .iter()
            .copied()
            .filter(|&v| !adjacency[u][v])
            .collect(),
        None => candidates.clone(),
    };

    let mut candidates = candidates;
    let mut excluded = excluded;
    for v in branch {
        let next_candidates: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&w| adjacency[v][w])
            .collect();
        let next_excluded: Vec<usize> = excluded
            .iter()
            .copied()
            .filter(|&w| adjacency[v][w])
            .collect();

        current.push(v);
        expand(adjacency, current, next_candidates, next_excluded, cliques);
        current.pop();

        candidates.retain(|&w| w != v);
        excluded.push(v);
    }
}
