use std::num::NonZeroUsize;

/// Maximum number of hosts per metric request, keeps the query string under URL length limits
pub const BATCH_LIMIT: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(limit) => limit,
    None => panic!("batch limit must be non-zero"),
};

/// Split `ids` into contiguous batches of at most `limit` items, preserving order.
///
/// Concatenating the batches yields `ids` again. An empty input yields no batches.
pub fn partition<T: Clone>(ids: &[T], limit: NonZeroUsize) -> Vec<Vec<T>> {
    ids.chunks(limit.get()).map(<[T]>::to_vec).collect()
}
