/*
 * Copyright [2022] [Kevin Velasco]
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use chunk_core::{ByteSize, Chunk, ChunkDescription, EntrySignature};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Bucket {
    SmallPure,
    SmallSideEffect,
    BigPure,
    BigSideEffect,
}

struct Pools {
    small_pure: Vec<ChunkDescription>,
    small_side_effect: Vec<ChunkDescription>,
    big_pure: Vec<ChunkDescription>,
    big_side_effect: Vec<ChunkDescription>,
}

impl Pools {
    fn partition(groups: Vec<ChunkDescription>, min_chunk_size: u64) -> Self {
        let mut pools = Pools {
            small_pure: Vec::new(),
            small_side_effect: Vec::new(),
            big_pure: Vec::new(),
            big_side_effect: Vec::new(),
        };
        for group in groups {
            let bucket = bucket_for(group.size, group.pure, min_chunk_size);
            pools.bucket_mut(bucket).push(group);
        }
        pools.small_pure.sort_by_key(|c| c.size);
        pools.small_side_effect.sort_by_key(|c| c.size);
        pools.big_pure.sort_by_key(|c| c.size);
        pools.big_side_effect.sort_by_key(|c| c.size);
        pools
    }

    fn bucket(&self, id: Bucket) -> &Vec<ChunkDescription> {
        match id {
            Bucket::SmallPure => &self.small_pure,
            Bucket::SmallSideEffect => &self.small_side_effect,
            Bucket::BigPure => &self.big_pure,
            Bucket::BigSideEffect => &self.big_side_effect,
        }
    }

    fn bucket_mut(&mut self, id: Bucket) -> &mut Vec<ChunkDescription> {
        match id {
            Bucket::SmallPure => &mut self.small_pure,
            Bucket::SmallSideEffect => &mut self.small_side_effect,
            Bucket::BigPure => &mut self.big_pure,
            Bucket::BigSideEffect => &mut self.big_side_effect,
        }
    }
}

fn bucket_for(size: ByteSize, pure: bool, min_chunk_size: u64) -> Bucket {
    let small = size.0 < min_chunk_size;
    match (small, pure) {
        (true, true) => Bucket::SmallPure,
        (true, false) => Bucket::SmallSideEffect,
        (false, true) => Bucket::BigPure,
        (false, false) => Bucket::BigSideEffect,
    }
}

/// Keeps a bucket sorted ascending by size; ties keep the relative order
/// they already had (new arrivals land after existing equal-size peers).
fn insert_sorted(bucket: &mut Vec<ChunkDescription>, chunk: ChunkDescription) {
    let position = bucket.partition_point(|existing| existing.size <= chunk.size);
    bucket.insert(position, chunk);
}

/// Scans `order` for the target minimizing `distance`, breaking ties by
/// encounter order and short-circuiting the instant a distance of
/// exactly 1 becomes the running best — a later 0 would win, but a
/// later 1 never displaces an already-found 0.
fn find_best_target(
    pools: &Pools,
    order: &[Bucket],
    distance: impl Fn(&ChunkDescription) -> Option<usize>,
) -> Option<(Bucket, usize)> {
    let mut best: Option<(usize, Bucket, usize)> = None;

    'scan: for &bucket_id in order {
        for (idx, target) in pools.bucket(bucket_id).iter().enumerate() {
            if let Some(d) = distance(target) {
                let is_better = match best {
                    Some((current, _, _)) => d < current,
                    None => true,
                };
                if is_better {
                    best = Some((d, bucket_id, idx));
                    if d == 1 {
                        break 'scan;
                    }
                }
            }
        }
    }

    best.map(|(_, bucket_id, idx)| (bucket_id, idx))
}

/// Pass 1 — folds small side-effect chunks into a pure target, under the
/// signature-subset constraint that protects the target from gaining
/// entries it never depended on.
fn pass_one(pools: &mut Pools, min_chunk_size: u64) {
    let sources = std::mem::take(&mut pools.small_side_effect);
    for source in sources {
        let target = find_best_target(
            pools,
            &[Bucket::SmallPure, Bucket::BigPure],
            |candidate| EntrySignature::distance(&candidate.signature, &source.signature, true),
        );

        match target {
            Some((bucket_id, idx)) => {
                let mut target = pools.bucket_mut(bucket_id).remove(idx);
                target.absorb(source);
                let new_bucket = bucket_for(target.size, target.pure, min_chunk_size);
                insert_sorted(pools.bucket_mut(new_bucket), target);
            }
            None => insert_sorted(&mut pools.small_side_effect, source),
        }
    }
}

/// Pass 2 — folds remaining small pure chunks into any target, enforcing
/// the subset constraint only when the target itself carries side
/// effects (a pure target can absorb anything; a side-effect target must
/// not be handed entries it didn't already need).
fn pass_two(pools: &mut Pools, min_chunk_size: u64) {
    let sources = std::mem::take(&mut pools.small_pure);
    for source in sources {
        let target = find_best_target(
            pools,
            &[Bucket::SmallPure, Bucket::BigSideEffect, Bucket::BigPure],
            |candidate| {
                EntrySignature::distance(&source.signature, &candidate.signature, !candidate.pure)
            },
        );

        match target {
            Some((bucket_id, idx)) => {
                let mut target = pools.bucket_mut(bucket_id).remove(idx);
                target.absorb(source);
                let new_bucket = bucket_for(target.size, target.pure, min_chunk_size);
                insert_sorted(pools.bucket_mut(new_bucket), target);
            }
            None => insert_sorted(&mut pools.small_pure, source),
        }
    }
}

/// Phase 4.6 — the two-pass size-driven merge. Assumes `min_chunk_size`
/// is non-zero; callers skip this entirely and emit one chunk per group
/// when it is.
pub fn merge_chunks(groups: Vec<ChunkDescription>, min_chunk_size: u64) -> Vec<Chunk> {
    let mut pools = Pools::partition(groups, min_chunk_size);

    tracing::debug!(
        small_pure = pools.small_pure.len(),
        small_side_effect = pools.small_side_effect.len(),
        big_pure = pools.big_pure.len(),
        big_side_effect = pools.big_side_effect.len(),
        "starting chunk merge"
    );

    pass_one(&mut pools, min_chunk_size);
    pass_two(&mut pools, min_chunk_size);

    pools
        .small_side_effect
        .into_iter()
        .chain(pools.small_pure)
        .chain(pools.big_side_effect)
        .chain(pools.big_pure)
        .map(Chunk::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunk_core::ModuleId;

    fn sig(len: usize, set_bits: &[usize]) -> EntrySignature {
        let mut s = EntrySignature::new(len);
        for &i in set_bits {
            s.set(i);
        }
        s
    }

    fn desc(name: &str, signature: EntrySignature, size: u64, pure: bool) -> ChunkDescription {
        ChunkDescription::new(vec![ModuleId::from(name)], signature, ByteSize(size), pure)
    }

    #[test]
    fn small_pure_merges_into_compatible_big_pure_at_distance_one() {
        let groups = vec![
            desc("big", sig(2, &[0, 1]), 10_000, true),
            desc("small", sig(2, &[0]), 50, true),
        ];
        let chunks = merge_chunks(groups, 1_000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].modules.len(), 2);
    }

    #[test]
    fn small_side_effect_is_not_merged_into_incompatible_pure_target() {
        let groups = vec![
            desc("pure", sig(2, &[1]), 10_000, true),
            desc("side_effect", sig(2, &[0]), 50, false),
        ];
        let chunks = merge_chunks(groups, 1_000);
        // the side-effect source needs entry 0, which the pure target lacks;
        // distance is infinite, so it stays unmerged as its own chunk.
        assert_eq!(chunks.len(), 2);
        assert!(chunks
            .iter()
            .any(|c| c.modules == vec![ModuleId::from("side_effect")]));
    }

    #[test]
    fn merging_a_side_effect_source_turns_the_target_impure() {
        // the pure target's footprint (entry 0 only) is a subset of the
        // side-effect source's (entries 0 and 1), so pass 1 allows it.
        let groups = vec![
            desc("pure", sig(2, &[0]), 10_000, true),
            desc("side_effect", sig(2, &[0, 1]), 50, false),
        ];
        let chunks = merge_chunks(groups, 1_000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].modules.len(), 2);
    }

    #[test]
    fn unmergeable_small_chunks_survive_as_their_own_output_chunk() {
        let groups = vec![desc("lonely", sig(1, &[0]), 10, true)];
        let chunks = merge_chunks(groups, 1_000);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].modules, vec![ModuleId::from("lonely")]);
    }

    #[test]
    fn small_side_effect_chunks_needing_entries_the_big_target_lacks_stay_unmerged() {
        // big (XX) needs both entries; left (X_) and right (_X) each need
        // only one. getSignatureDistance(T=XX, S=left/right, true) is
        // infinite both ways: XX has an 'X' the smaller source lacks, so
        // T is not a subset of S's original needs and absorbing either
        // one would let XX's side effects run under an entry it never
        // needed before. Both stay their own chunk.
        let groups = vec![
            desc("big", sig(2, &[0, 1]), 10_000, true),
            desc("left", sig(2, &[0]), 10, false),
            desc("right", sig(2, &[1]), 20, false),
        ];
        let chunks = merge_chunks(groups, 1_000);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().any(|c| c.modules == vec![ModuleId::from("left")]));
        assert!(chunks.iter().any(|c| c.modules == vec![ModuleId::from("right")]));
    }
}
