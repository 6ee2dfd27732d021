//! This module implements exponential (galloping) search.

/// Returns the first index `i >= start` such that `predicate(&data[i])` is false,
/// or `data.len()` if there is none.
///
/// `predicate` must be monotone on `data[start..]`, i.e. once it returns false
/// it returns false for all later elements. The cost is logarithmic in the
/// distance between `start` and the result rather than in the length of `data`,
/// which makes repeated forward searches from a moving cursor cheap.
pub fn exponential_search<T, P>(data: &[T], start: usize, mut predicate: P) -> usize
where
    P: FnMut(&T) -> bool,
{
    if start >= data.len() || !predicate(&data[start]) {
        return start.min(data.len());
    }

    // Invariant: predicate holds at `start + bound / 2`
    let mut bound = 1;
    while start + bound < data.len() && predicate(&data[start + bound]) {
        bound *= 2;
    }

    let lower = start + bound / 2 + 1;
    let upper = (start + bound).min(data.len());

    lower + data[lower..upper].partition_point(predicate)
}
