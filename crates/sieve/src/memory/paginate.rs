//! Offset/limit windows over record lists.

/// Returns the window `[offset, offset + limit)` of `records`.
///
/// A negative offset counts as zero, an offset past the end yields an empty
/// slice, and a `limit` of zero or less means "everything from `offset`".
/// Never fails.
pub fn paginate<T>(records: &[T], offset: i64, limit: i64) -> &[T] {
    let (start, end) = window(records.len(), offset, limit);
    &records[start..end]
}

/// Owned variant of [`paginate`].
pub fn paginate_vec<T>(mut records: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    let (start, end) = window(records.len(), offset, limit);
    records.truncate(end);
    records.drain(..start);
    records
}

fn window(len: usize, offset: i64, limit: i64) -> (usize, usize) {
    let start = usize::try_from(offset.max(0)).unwrap_or(usize::MAX).min(len);
    let end = if limit <= 0 {
        len
    } else {
        start
            .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
            .min(len)
    };
    (start, end)
}
