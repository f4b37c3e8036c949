//! Day route sequencing with fixed entry and exit stops
//!
//! Small days get an exhaustive search over the interior stops. Days with
//! more interior stops than the exhaustive bound are ordered by nearest
//! neighbour and then improved with open 2-opt, endpoints held fixed.

use tracing::debug;

use crate::geo::{distance_between, path_length};
use crate::models::{Poi, SequencedDay, poi::validate_all};
use crate::Result;

const TWO_OPT_MAX_PASSES: usize = 64;

/// Rearrange `indices` into the next lexicographic permutation.
/// Returns `false` once the last permutation has been reached.
fn next_permutation(indices: &mut [usize]) -> bool {
    if indices.len() < 2 {
        return false;
    }
    let Some(pivot) = (0..indices.len() - 1).rev().find(|&i| indices[i] < indices[i + 1]) else {
        return false;
    };
    let successor = (pivot + 1..indices.len())
        .rev()
        .find(|&j| indices[j] > indices[pivot])
        .unwrap_or(pivot + 1);
    indices.swap(pivot, successor);
    indices[pivot + 1..].reverse();
    true
}

fn order_length(pois: &[Poi], order: &[usize]) -> f64 {
    order
        .windows(2)
        .map(|leg| distance_between(&pois[leg[0]], &pois[leg[1]]))
        .sum()
}

/// Greedy order: from the entry stop, always visit the closest unvisited
/// interior stop, then the exit stop. Ties go to the lower index.
fn nearest_neighbour_order(pois: &[Poi]) -> Vec<usize> {
    let n = pois.len();
    let mut remaining: Vec<usize> = (1..n - 1).collect();
    let mut order = Vec::with_capacity(n);
    order.push(0);
    while !remaining.is_empty() {
        let current = order[order.len() - 1];
        let mut best = 0;
        let mut best_leg = f64::INFINITY;
        for (slot, &candidate) in remaining.iter().enumerate() {
            let leg = distance_between(&pois[current], &pois[candidate]);
            if leg < best_leg {
                best_leg = leg;
                best = slot;
            }
        }
        order.push(remaining.remove(best));
    }
    order.push(n - 1);
    order
}

/// Open 2-opt over the interior positions of `order`. Reversing
/// `order[i..=j]` with `1 <= i < j <= n - 2` never moves the endpoints.
fn two_opt(pois: &[Poi], order: &mut [usize]) {
    let n = order.len();
    if n < 4 {
        return;
    }
    for _ in 0..TWO_OPT_MAX_PASSES {
        let mut improved = false;
        for i in 1..n - 2 {
            for j in i + 1..n - 1 {
                let a = &pois[order[i - 1]];
                let b = &pois[order[i]];
                let c = &pois[order[j]];
                let d = &pois[order[j + 1]];
                let before = distance_between(a, b) + distance_between(c, d);
                let after = distance_between(a, c) + distance_between(b, d);
                if after + 1e-9 < before {
                    order[i..=j].reverse();
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

fn exhaustive_order(pois: &[Poi]) -> (Vec<usize>, usize) {
    let n = pois.len();
    let mut middle: Vec<usize> = (1..n - 1).collect();
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut best_order: Vec<usize> = (0..n).collect();
    let mut best_distance = f64::INFINITY;
    let mut evaluated = 0usize;

    loop {
        order.clear();
        order.push(0);
        order.extend_from_slice(&middle);
        order.push(n - 1);

        let total = order_length(pois, &order);
        evaluated += 1;
        if total < best_distance {
            best_distance = total;
            best_order.clone_from(&order);
        }

        if !next_permutation(&mut middle) {
            break;
        }
    }
    (best_order, evaluated)
}

/// Order one day's POIs for the shortest total great-circle path while
/// keeping the first and last POI in place.
///
/// Up to `max_interior` interior stops, orderings are enumerated
/// lexicographically and the first minimum found wins ties. Larger days
/// use nearest neighbour plus 2-opt, which is not guaranteed optimal.
pub fn sequence_day(pois: Vec<Poi>, max_interior: usize) -> Result<SequencedDay> {
    validate_all(&pois)?;

    if pois.len() <= 2 {
        let distance_km = path_length(&pois);
        return Ok(SequencedDay {
            ordered: pois,
            distance_km,
        });
    }

    let n = pois.len();
    let best_order = if n - 2 <= max_interior {
        let (order, evaluated) = exhaustive_order(&pois);
        debug!(stops = n, evaluated, "day sequenced exhaustively");
        order
    } else {
        let mut order = nearest_neighbour_order(&pois);
        two_opt(&pois, &mut order);
        debug!(stops = n, max_interior, "day sequenced heuristically");
        order
    };
    let distance_km = order_length(&pois, &best_order);

    let mut slots: Vec<Option<Poi>> = pois.into_iter().map(Some).collect();
    let ordered: Vec<Poi> = best_order.iter().filter_map(|&idx| slots[idx].take()).collect();

    Ok(SequencedDay {
        ordered,
        distance_km,
    })
}
