//! Greedy capacity-feasible assignment of clients to medians.
//!
//! Scores a median set by assigning every client to the nearest median
//! that can still absorb its demand. Clients are processed in demand
//! order, largest first: the published heuristic's nearest-median client
//! order breaks under capacity constraints because a late high-demand
//! client can find every nearby median full.

use crate::aco::dataset::PMedianInstance;
use crate::error::{Error, Result};

/// A feasible assignment and its objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct GapAssignment {
    /// Sum of client-to-assigned-median distances.
    pub total_distance: f64,
    /// `assigned[i]` is the median serving point `i`; medians serve
    /// themselves.
    pub assigned: Vec<usize>,
}

/// Runs the GAP heuristic for the given partition of points into clients
/// and medians.
///
/// Each median's residual capacity starts at `capacity - demand` (it serves
/// itself first). Fails with [`Error::InfeasibleAssignment`] if some client
/// fits no median; the caller treats that candidate as infinite-cost.
pub fn gap(
    instance: &PMedianInstance,
    clients: &[usize],
    medians: &[usize],
    distances: &[Vec<f64>],
) -> Result<GapAssignment> {
    // Per client, medians sorted by distance ascending.
    let mut client_medians: Vec<(usize, Vec<usize>)> = clients
        .iter()
        .map(|&client| {
            let mut ranked = medians.to_vec();
            ranked.sort_by(|&a, &b| {
                distances[client][a]
                    .partial_cmp(&distances[client][b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            (client, ranked)
        })
        .collect();

    // Clients by demand, descending.
    client_medians.sort_by(|a, b| {
        instance
            .point(b.0)
            .demand
            .partial_cmp(&instance.point(a.0).demand)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut residual = vec![0.0; instance.num_points()];
    let mut assigned = vec![usize::MAX; instance.num_points()];
    for &median in medians {
        let point = instance.point(median);
        residual[median] = point.capacity - point.demand;
        assigned[median] = median;
    }

    let mut total_distance = 0.0;
    for (client, ranked) in &client_medians {
        let demand = instance.point(*client).demand;
        let median = ranked
            .iter()
            .find(|&&median| demand <= residual[median])
            .copied()
            .ok_or(Error::InfeasibleAssignment {
                client: *client,
                demand,
            })?;
        residual[median] -= demand;
        assigned[*client] = median;
        total_distance += distances[*client][median];
    }

    Ok(GapAssignment {
        total_distance,
        assigned,
    })
}
