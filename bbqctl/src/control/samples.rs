/// Ring length used when no capacity is named.
pub const DEFAULT_CAPACITY: usize = 64;

/// Mean of each voltage channel across the whole ring (mV).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleAverages {
    pub reference_mv: f64,
    pub ambient_mv: f64,
    pub food_mv: f64,
}

/// Fixed-capacity ring of raw voltage triples.
///
/// The three channels are stored as parallel arrays; slot `i` of each
/// array was written by the same [`record`](Self::record) call. Slots that
/// have never been written hold zero and still count towards the mean.
#[derive(Debug, Clone)]
pub struct SampleBuffer<const N: usize = DEFAULT_CAPACITY> {
    reference_mv: [u32; N],
    probe_mv: [[u32; N]; 2],
    cursor: usize,
    filled: usize,
}

impl<const N: usize> SampleBuffer<N> {
    const NON_EMPTY: () = assert!(N > 0, "sample buffer capacity must be non-zero");

    pub fn new() -> Self {
        let () = Self::NON_EMPTY;

        Self {
            reference_mv: [0; N],
            probe_mv: [[0; N]; 2],
            cursor: 0,
            filled: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of slots written since construction, saturating at capacity.
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn is_full(&self) -> bool {
        self.filled == N
    }

    /// Advance the cursor and overwrite the slot it lands on.
    ///
    /// Any value is accepted; implausible voltages are dealt with when
    /// they are converted to temperatures.
    pub fn record(&mut self, reference_mv: u32, ambient_mv: u32, food_mv: u32) {
        self.cursor = (self.cursor + 1) % N;
        self.reference_mv[self.cursor] = reference_mv;
        self.probe_mv[0][self.cursor] = ambient_mv;
        self.probe_mv[1][self.cursor] = food_mv;
        self.filled = (self.filled + 1).min(N);
    }

    pub fn averages(&self) -> SampleAverages {
        SampleAverages {
            reference_mv: mean(&self.reference_mv),
            ambient_mv: mean(&self.probe_mv[0]),
            food_mv: mean(&self.probe_mv[1]),
        }
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn mean<const N: usize>(slots: &[u32; N]) -> f64 {
    // Exact in f64: N * u32::MAX stays far below 2^53 for any sane N.
    slots.iter().map(|&mv| f64::from(mv)).sum::<f64>() / N as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_zeroed() {
        let buffer = SampleBuffer::<8>::new();

        assert_eq!(buffer.filled(), 0);
        assert_eq!(
            buffer.averages(),
            SampleAverages {
                reference_mv: 0.0,
                ambient_mv: 0.0,
                food_mv: 0.0,
            }
        );
    }

    #[test]
    fn should_average_unwritten_slots_as_zero() {
        let mut buffer = SampleBuffer::<4>::new();

        buffer.record(1600, 800, 400);
        buffer.record(1600, 800, 400);

        let avg = buffer.averages();
        assert_eq!(avg.reference_mv, 800.0);
        assert_eq!(avg.ambient_mv, 400.0);
        assert_eq!(avg.food_mv, 200.0);
        assert!(!buffer.is_full());
    }

    #[test]
    fn should_reflect_only_most_recent_samples_after_wrapping() {
        let mut buffer = SampleBuffer::<4>::new();

        for mv in [9000, 9000, 9000, 9000, 9000, 9000] {
            buffer.record(mv, mv, mv);
        }
        for mv in [100, 200, 300, 400] {
            buffer.record(mv, mv + 1, mv + 2);
        }

        let avg = buffer.averages();
        assert_eq!(avg.reference_mv, 250.0);
        assert_eq!(avg.ambient_mv, 251.0);
        assert_eq!(avg.food_mv, 252.0);
    }

    #[test]
    fn should_overwrite_oldest_slot_first() {
        let mut buffer = SampleBuffer::<3>::new();

        buffer.record(300, 0, 0);
        buffer.record(300, 0, 0);
        buffer.record(300, 0, 0);
        buffer.record(0, 0, 0);

        assert_eq!(buffer.averages().reference_mv, 200.0);
    }

    #[test]
    fn should_keep_channels_aligned_per_slot() {
        let mut buffer = SampleBuffer::<2>::new();

        buffer.record(1, 10, 100);
        buffer.record(2, 20, 200);
        buffer.record(3, 30, 300);

        let avg = buffer.averages();
        assert_eq!(avg.reference_mv, 2.5);
        assert_eq!(avg.ambient_mv, 25.0);
        assert_eq!(avg.food_mv, 250.0);
    }

    #[test]
    fn should_saturate_fill_count_at_capacity() {
        let mut buffer = SampleBuffer::<2>::new();

        buffer.record(1, 1, 1);
        assert_eq!(buffer.filled(), 1);

        buffer.record(1, 1, 1);
        buffer.record(1, 1, 1);
        assert_eq!(buffer.filled(), 2);
        assert!(buffer.is_full());
    }

    #[test]
    fn should_accept_extreme_values() {
        let mut buffer = SampleBuffer::<1>::new();

        buffer.record(u32::MAX, u32::MAX, 0);

        let avg = buffer.averages();
        assert_eq!(avg.reference_mv, f64::from(u32::MAX));
        assert_eq!(avg.food_mv, 0.0);
    }

    #[test]
    fn should_default_to_sixty_four_slots() {
        let buffer: SampleBuffer = SampleBuffer::default();

        assert_eq!(buffer.capacity(), DEFAULT_CAPACITY);
        assert_eq!(buffer.capacity(), 64);
    }
}
