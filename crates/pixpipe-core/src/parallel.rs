//! Row-range parallel dispatch.
//!
//! Every per-pixel operation in pixpipe splits its rows with this module
//! instead of managing threads itself.
//!
//! `parallel(n, f)` calls `f(start, end)` on contiguous chunks that cover
//! `[0, n)` exactly once. Chunk `i` of `p` is `[n*i/p, n*(i+1)/p)`. The call
//! returns only after every chunk has finished.
//!
//! Parallelism `p` is [`rayon::current_num_threads`] clamped to `[1, n]`,
//! so it follows `RAYON_NUM_THREADS` and any pool entered with
//! [`rayon::ThreadPool::install`]. With `p == 1` the work runs on the
//! calling thread.
//!
//! # Example
//!
//! ```rust
//! use pixpipe_core::parallel;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let rows = AtomicUsize::new(0);
//! parallel::parallel(100, |start, end| {
//!     rows.fetch_add(end - start, Ordering::Relaxed);
//! });
//! assert_eq!(rows.into_inner(), 100);
//! ```

use std::ops::Range;

/// Runs `f` over `[0, n)` split by detected parallelism.
pub fn parallel<F>(n: usize, f: F)
where
    F: Fn(usize, usize) + Sync,
{
    parallel_with(n, rayon::current_num_threads(), f)
}

/// Runs `f` over `[0, n)` split into at most `p` chunks.
pub fn parallel_with<F>(n: usize, p: usize, f: F)
where
    F: Fn(usize, usize) + Sync,
{
    let ranges = partition(n, p);
    match ranges.len() {
        0 => {}
        1 => f(0, n),
        _ => {
            let f = &f;
            rayon::scope(|s| {
                for r in ranges {
                    s.spawn(move |_| f(r.start, r.end));
                }
            });
        }
    }
}

/// Chunk ranges used for `n` rows and parallelism `p`.
///
/// Empty for `n == 0`. Otherwise `p` is clamped to `[1, n]` and the result
/// has exactly `p` non-empty, ascending, contiguous ranges.
pub fn partition(n: usize, p: usize) -> Vec<Range<usize>> {
    if n < 1 {
        return Vec::new();
    }
    let p = p.clamp(1, n);
    (0..p).map(|i| n * i / p..n * (i + 1) / p).collect()
}

/// Runs `f` over the first `n` rows of a row-major buffer, handing each
/// worker the mutable band of bytes for its own rows.
///
/// `f(start, end, band)` receives `band` starting at row `start`; row
/// `y` lives at `band[(y - start) * stride..]`. The final band may be
/// shorter than `(end - start) * stride` when the buffer omits trailing
/// padding.
pub fn parallel_rows_mut<F>(buf: &mut [u8], stride: usize, n: usize, f: F)
where
    F: Fn(usize, usize, &mut [u8]) + Sync,
{
    parallel_rows_mut_with(buf, stride, n, rayon::current_num_threads(), f)
}

/// [`parallel_rows_mut`] with explicit parallelism.
pub fn parallel_rows_mut_with<F>(buf: &mut [u8], stride: usize, n: usize, p: usize, f: F)
where
    F: Fn(usize, usize, &mut [u8]) + Sync,
{
    let ranges = partition(n, p);
    if ranges.len() == 1 {
        f(0, n, buf);
        return;
    }

    let mut bands = Vec::with_capacity(ranges.len());
    let mut rest = buf;
    for r in ranges {
        let len = ((r.end - r.start) * stride).min(rest.len());
        let (band, tail) = std::mem::take(&mut rest).split_at_mut(len);
        bands.push((r, band));
        rest = tail;
    }

    let f = &f;
    rayon::scope(|s| {
        for (r, band) in bands {
            s.spawn(move |_| f(r.start, r.end, band));
        }
    });
}
