//! Fixed-window moving average.

/// Moving average over the last `window` values.
#[derive(Debug, Clone)]
pub struct RunningAverage {
    window: Vec<f64>,
    sum: f64,
    write_pos: usize,
    count: usize,
}

impl RunningAverage {
    /// Create an empty average. A zero window is treated as one.
    pub fn new(window: usize) -> Self {
        RunningAverage {
            window: vec![0.0; window.max(1)],
            sum: 0.0,
            write_pos: 0,
            count: 0,
        }
    }

    /// Push a value and return the updated average.
    pub fn update(&mut self, value: f64) -> f64 {
        if self.count < self.window.len() {
            self.sum += value;
            self.count += 1;
        } else {
            self.sum = self.sum - self.window[self.write_pos] + value;
        }
        self.window[self.write_pos] = value;

        self.write_pos = (self.write_pos + 1) % self.window.len();
        self.average()
    }

    /// Current average, 0.0 before the first update.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    pub fn reset(&mut self) {
        self.sum = 0.0;
        self.write_pos = 0;
        self.count = 0;
    }
}
