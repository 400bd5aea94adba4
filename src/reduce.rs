//! Collective reductions across the patches of a decomposed domain.
//!
//! The lightning scheme never reads another patch's memory. When it needs a domain wide value, a
//! total flash rate or the highest cloud top, it asks a `Reducer`. Every participating patch must
//! make the same sequence of calls, each call blocks until all of them have contributed, and every
//! caller gets the same reduced value back.
use std::sync::{Arc, Barrier, Mutex, MutexGuard};

/// Blocking, barrier style reductions over all participating patches.
pub trait Reducer {
    /// Sum of `local` over all participants.
    fn sum(&self, local: f64) -> f64;

    /// Maximum of `local` over all participants.
    fn max(&self, local: f64) -> f64;

    /// Minimum of `local` over all participants.
    fn min(&self, local: f64) -> f64;
}

/// A reducer for a single patch that is the whole domain. Every reduction is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalReducer;

impl Reducer for LocalReducer {
    #[inline]
    fn sum(&self, local: f64) -> f64 {
        local
    }

    #[inline]
    fn max(&self, local: f64) -> f64 {
        local
    }

    #[inline]
    fn min(&self, local: f64) -> f64 {
        local
    }
}

#[derive(Debug)]
struct Shared {
    barrier: Barrier,
    slots: Mutex<Vec<f64>>,
}

impl Shared {
    fn slots(&self) -> MutexGuard<'_, Vec<f64>> {
        // Slots are plain numbers, a poisoned lock still holds valid data.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A reducer for patches running on separate threads of one process.
///
/// Create one handle per patch with [`BarrierReducer::group`] and move each handle to the thread
/// that processes its patch. Contributions are combined in rank order, so results do not depend
/// on thread scheduling. There is exactly one handle per rank, so handles are not `Clone`.
///
/// ```compile_fail
/// use lightning_nox::BarrierReducer;
///
/// let handles = BarrierReducer::group(2);
/// let second_rank_zero = handles[0].clone();
/// ```
#[derive(Debug)]
pub struct BarrierReducer {
    rank: usize,
    shared: Arc<Shared>,
}

impl BarrierReducer {
    /// Create handles for `participants` patches. Returns an empty vector for zero participants.
    pub fn group(participants: usize) -> Vec<BarrierReducer> {
        if participants == 0 {
            return vec![];
        }

        let shared = Arc::new(Shared {
            barrier: Barrier::new(participants),
            slots: Mutex::new(vec![0.0; participants]),
        });

        (0..participants)
            .map(|rank| BarrierReducer {
                rank,
                shared: Arc::clone(&shared),
            })
            .collect()
    }

    /// The rank of this participant.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    fn reduce<F>(&self, local: f64, combine: F) -> f64
    where
        F: Fn(f64, f64) -> f64,
    {
        self.shared.slots()[self.rank] = local;
        self.shared.barrier.wait();

        let result = {
            let slots = self.shared.slots();
            let mut iter = slots.iter().cloned();
            let first = iter.next().unwrap_or(local);
            iter.fold(first, &combine)
        };

        // Nobody may overwrite a slot until everyone has read them all.
        self.shared.barrier.wait();

        result
    }
}

impl Reducer for BarrierReducer {
    fn sum(&self, local: f64) -> f64 {
        self.reduce(local, |a, b| a + b)
    }

    fn max(&self, local: f64) -> f64 {
        self.reduce(local, f64::max)
    }

    fn min(&self, local: f64) -> f64 {
        self.reduce(local, f64::min)
    }
}
