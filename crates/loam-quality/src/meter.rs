#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FpsSample {
    pub fps: f64,
    pub span_ms: f64,
}

/// Counts frames and reports a rate once per window of elapsed frame time.
#[derive(Clone, Debug)]
pub struct FpsMeter {
    window_ms: f64,
    start_ms: Option<f64>,
    frames: u32,
    last: Option<FpsSample>,
}

impl FpsMeter {
    pub const DEFAULT_WINDOW_MS: f64 = 500.0;

    pub fn new(window_ms: f64) -> Self {
        let window_ms = if window_ms.is_finite() && window_ms > 0.0 {
            window_ms
        } else {
            Self::DEFAULT_WINDOW_MS
        };
        Self {
            window_ms,
            start_ms: None,
            frames: 0,
            last: None,
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Record one presented frame at `now_ms`.
    pub fn frame(&mut self, now_ms: f64) -> Option<FpsSample> {
        if !now_ms.is_finite() {
            return None;
        }
        self.frames += 1;
        let start = *self.start_ms.get_or_insert(now_ms);
        let span = now_ms - start;
        if span < 0.0 {
            self.start_ms = Some(now_ms);
            self.frames = 0;
            return None;
        }
        if span < self.window_ms {
            return None;
        }
        let sample = FpsSample {
            fps: f64::from(self.frames) * 1000.0 / span,
            span_ms: span,
        };
        self.frames = 0;
        self.start_ms = Some(now_ms);
        self.last = Some(sample);
        Some(sample)
    }

    pub fn last(&self) -> Option<FpsSample> {
        self.last
    }

    pub fn reset(&mut self) {
        self.start_ms = None;
        self.frames = 0;
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW_MS)
    }
}
