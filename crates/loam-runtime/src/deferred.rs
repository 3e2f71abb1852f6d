use hashbrown::HashSet;

/// Receiver of flushed work. Implementations must not hold the `DeferredWork` they
/// are flushed from, so nothing a sink does can enqueue into the running flush.
pub trait DeferredSink {
    fn recompute_light(&mut self, x: i32, y: i32);
    fn invalidate_minimap(&mut self);
    fn rebuild_hotbar(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub lights: usize,
    /// Light requests left pending because the interval has not elapsed.
    pub lights_held: usize,
    pub minimap: bool,
    pub hotbar: bool,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.lights == 0 && !self.minimap && !self.hotbar
    }
}

/// Intents recorded during simulation steps and flushed once per rendered frame.
#[derive(Debug, Default)]
pub struct DeferredWork {
    lights: Vec<(i32, i32)>,
    queued: HashSet<(i32, i32)>,
    drain: Vec<(i32, i32)>,
    minimap: bool,
    hotbar: bool,
    light_interval_ms: f64,
    last_light_flush: Option<f64>,
}

impl DeferredWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_light_interval(ms: f64) -> Self {
        let mut d = Self::new();
        d.set_light_interval_ms(ms);
        d
    }

    /// Queue a light recompute centered on `(x, y)`; repeated coordinates collapse.
    pub fn request_light(&mut self, x: i32, y: i32) {
        if self.queued.insert((x, y)) {
            self.lights.push((x, y));
        }
    }

    pub fn request_minimap_refresh(&mut self) {
        self.minimap = true;
    }

    pub fn request_hotbar_refresh(&mut self) {
        self.hotbar = true;
    }

    /// Minimum spacing between light flushes; 0 flushes every frame.
    pub fn set_light_interval_ms(&mut self, ms: f64) {
        self.light_interval_ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
    }

    pub fn light_interval_ms(&self) -> f64 {
        self.light_interval_ms
    }

    pub fn pending_lights(&self) -> &[(i32, i32)] {
        &self.lights
    }

    pub fn is_idle(&self) -> bool {
        self.lights.is_empty() && !self.minimap && !self.hotbar
    }

    fn light_due(&self, now_ms: f64) -> bool {
        let interval = self.light_interval_ms;
        match self.last_light_flush {
            _ if interval <= 0.0 => true,
            None => true,
            Some(last) => !now_ms.is_finite() || now_ms - last >= interval,
        }
    }

    /// Run everything pending against `sink`: light first, then minimap, then hotbar.
    pub fn flush<S: DeferredSink + ?Sized>(&mut self, now_ms: f64, sink: &mut S) -> FlushReport {
        let mut report = FlushReport::default();

        if !self.lights.is_empty() {
            if self.light_due(now_ms) {
                std::mem::swap(&mut self.lights, &mut self.drain);
                self.queued.clear();
                if now_ms.is_finite() {
                    self.last_light_flush = Some(now_ms);
                }
                for &(x, y) in &self.drain {
                    sink.recompute_light(x, y);
                }
                report.lights = self.drain.len();
                self.drain.clear();
            } else {
                report.lights_held = self.lights.len();
            }
        }
        if self.minimap {
            self.minimap = false;
            sink.invalidate_minimap();
            report.minimap = true;
        }
        if self.hotbar {
            self.hotbar = false;
            sink.rebuild_hotbar();
            report.hotbar = true;
        }

        if !report.is_empty() {
            log::trace!(
                target: "deferred",
                "flush lights={} held={} minimap={} hotbar={}",
                report.lights,
                report.lights_held,
                report.minimap,
                report.hotbar
            );
        }
        report
    }

    /// Drop all pending intents and forget the last light flush.
    pub fn clear(&mut self) {
        self.lights.clear();
        self.queued.clear();
        self.minimap = false;
        self.hotbar = false;
        self.last_light_flush = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Log {
        lights: Vec<(i32, i32)>,
        minimap: u32,
        hotbar: u32,
    }

    impl DeferredSink for Log {
        fn recompute_light(&mut self, x: i32, y: i32) {
            self.lights.push((x, y));
        }
        fn invalidate_minimap(&mut self) {
            self.minimap += 1;
        }
        fn rebuild_hotbar(&mut self) {
            self.hotbar += 1;
        }
    }

    #[test]
    fn duplicates_collapse_in_request_order() {
        let mut d = DeferredWork::new();
        d.request_light(3, 4);
        d.request_light(1, 1);
        d.request_light(3, 4);
        d.request_minimap_refresh();
        d.request_minimap_refresh();
        let mut sink = Log::default();
        let r = d.flush(0.0, &mut sink);
        assert_eq!(sink.lights, vec![(3, 4), (1, 1)]);
        assert_eq!(sink.minimap, 1);
        assert_eq!(sink.hotbar, 0);
        assert_eq!(r, FlushReport { lights: 2, lights_held: 0, minimap: true, hotbar: false });
        assert!(d.is_idle());
        // a coordinate may be requested again after its flush
        d.request_light(3, 4);
        assert_eq!(d.pending_lights(), &[(3, 4)]);
    }

    #[test]
    fn interval_holds_lights_but_not_flags() {
        let mut d = DeferredWork::with_light_interval(50.0);
        let mut sink = Log::default();
        d.request_light(0, 0);
        assert_eq!(d.flush(1000.0, &mut sink).lights, 1);

        d.request_light(1, 0);
        d.request_hotbar_refresh();
        let r = d.flush(1020.0, &mut sink);
        assert_eq!(r.lights, 0);
        assert_eq!(r.lights_held, 1);
        assert!(r.hotbar);
        assert_eq!(d.pending_lights(), &[(1, 0)]);

        assert_eq!(d.flush(1050.0, &mut sink).lights, 1);
        assert_eq!(sink.lights, vec![(0, 0), (1, 0)]);
        assert_eq!(sink.hotbar, 1);
    }

    #[test]
    fn empty_flush_is_free() {
        let mut d = DeferredWork::new();
        let mut sink = Log::default();
        assert!(d.flush(5.0, &mut sink).is_empty());
        assert!(sink.lights.is_empty());
        assert_eq!(sink.minimap + sink.hotbar, 0);
    }

    #[test]
    fn bad_interval_means_every_frame() {
        let mut d = DeferredWork::new();
        d.set_light_interval_ms(f64::NAN);
        assert_eq!(d.light_interval_ms(), 0.0);
        d.set_light_interval_ms(-10.0);
        assert_eq!(d.light_interval_ms(), 0.0);
    }
}
