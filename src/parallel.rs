// src/parallel.rs
//
// Data-parallel field evaluation. The atom range is cut into one contiguous
// partition per random stream; partitions share the read-only context and
// write disjoint slices of the accumulators, so no synchronisation is needed.

use rayon::prelude::*;

use crate::effective_field::{
    calculate_external_fields_chunk, calculate_spin_fields_chunk, FieldContext,
};
use crate::random::PartitionStreams;
use crate::stats::FixedMoment;
use crate::vector_field::VectorField;

/// Evaluate both accumulators for all atoms on the rayon pool.
///
/// Partition `p` always draws its thermal noise from stream `p`, so results
/// are reproducible for a fixed partition count.
pub fn compute_fields_parallel(
    ctx: &FieldContext,
    spin_field: &mut VectorField,
    external_field: &mut VectorField,
    streams: &mut PartitionStreams,
) {
    let n = ctx.system.n_atoms();
    debug_assert_eq!(spin_field.len(), n);
    debug_assert_eq!(external_field.len(), n);
    if n == 0 {
        return;
    }

    let chunk = n.div_ceil(streams.len());

    // The thin-film correction needs the total moment of the whole sample;
    // compute it once instead of once per partition.
    let moment;
    let mut shared = *ctx;
    if ctx.config.terms.applied && ctx.config.applied.thin_film_demag {
        moment = FixedMoment(ctx.stats.total_moment(ctx.system));
        shared.stats = &moment;
    }

    log::debug!(
        "evaluating fields for {n} atoms in {} partitions of {chunk}",
        n.div_ceil(chunk)
    );

    let jobs: Vec<_> = spin_field
        .chunks_mut(chunk)
        .zip(external_field.chunks_mut(chunk))
        .zip(streams.iter_mut())
        .collect();

    jobs.into_par_iter().for_each(|((mut spin, mut external), rng)| {
        calculate_spin_fields_chunk(&shared, &mut spin);
        calculate_external_fields_chunk(&shared, &mut external, rng);
    });
}
