/// Timer table of `(delay, action)` pairs advanced by the frame tick.
///
/// Delays are measured from the moment the schedule was created. Actions fire
/// in delay order, each exactly once.
#[derive(Debug, Clone)]
pub struct Schedule<A> {
    entries: Vec<(f64, A)>,
    next: usize,
    elapsed: f64,
}

impl<A: Clone> Schedule<A> {
    pub fn new(mut entries: Vec<(f64, A)>) -> Self {
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            entries,
            next: 0,
            elapsed: 0.0,
        }
    }

    /// `count` actions spaced `interval` seconds apart, the first one due immediately
    pub fn evenly_spaced(count: usize, interval: f64, action: impl Fn(usize) -> A) -> Self {
        Self::new(
            (0..count)
                .map(|i| (i as f64 * interval, action(i)))
                .collect(),
        )
    }

    /// Actions due at the current elapsed time without advancing it
    pub fn poll(&mut self) -> Vec<A> {
        let mut due = Vec::new();
        while let Some((delay, action)) = self.entries.get(self.next) {
            if *delay > self.elapsed {
                break;
            }
            due.push(action.clone());
            self.next += 1;
        }
        due
    }

    pub fn advance(&mut self, dt: f64) -> Vec<A> {
        self.elapsed += dt.max(0.0);
        self.poll()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.entries.len()
    }

    pub fn remaining(&self) -> usize {
        self.entries.len() - self.next
    }
}
