/// Virtual clock for the scheduling engine.
///
/// A `VirtualTime` is a whole number of CPU ticks since the start of a
/// run. It moves only when the engine executes a slice or jumps over an
/// idle gap, never from wall-clock observation.

/// A logical tick on the simulated CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualTime(u64);

impl VirtualTime {
    /// The instant a run starts.
    pub const ZERO: VirtualTime = VirtualTime(0);

    /// Create a new `VirtualTime` from a raw tick value.
    #[inline]
    pub fn new(ticks: u64) -> Self {
        VirtualTime(ticks)
    }

    /// Return the raw tick value.
    #[inline]
    pub fn ticks(self) -> u64 {
        self.0
    }

    /// Advance by `delta` ticks of CPU work.
    /// Returns `None` on overflow.
    #[inline]
    pub fn advance(self, delta: u64) -> Option<VirtualTime> {
        self.0.checked_add(delta).map(VirtualTime)
    }

    /// Jump forward to `target`, as when the CPU idles until the next
    /// arrival. Returns `None` if `target` lies in the past.
    #[inline]
    pub fn jump_to(self, target: VirtualTime) -> Option<VirtualTime> {
        if target < self {
            None
        } else {
            Some(target)
        }
    }

    /// Ticks elapsed from `earlier` to `self`, or `None` if `earlier`
    /// is actually later.
    #[inline]
    pub fn since(self, earlier: VirtualTime) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

impl std::fmt::Display for VirtualTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T={}", self.0)
    }
}
