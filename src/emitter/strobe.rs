use embassy_time::Duration;

/// Periodic on/off gate applied after sampling.
#[derive(Debug, Clone)]
pub(crate) struct Strobe {
    period: Duration,
    since_flip: Duration,
    on: bool,
}

impl Strobe {
    pub(crate) const fn new(period: Duration) -> Self {
        Self {
            period,
            since_flip: Duration::from_millis(0),
            on: true,
        }
    }

    /// Accumulate elapsed time and flip once the period is reached.
    ///
    /// A single tick flips at most once, however long it was.
    pub(crate) fn tick(&mut self, dt: Duration) {
        self.since_flip += dt;
        if self.since_flip >= self.period {
            self.on = !self.on;
            self.since_flip = Duration::from_millis(0);
        }
    }

    pub(crate) const fn is_on(&self) -> bool {
        self.on
    }
}
