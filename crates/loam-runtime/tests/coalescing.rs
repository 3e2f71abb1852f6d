use loam_runtime::{DeferredSink, DeferredWork};
use proptest::prelude::*;

#[derive(Default)]
struct Counts {
    lights: Vec<(i32, i32)>,
    minimap: u32,
    hotbar: u32,
}

impl DeferredSink for Counts {
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

proptest! {
    // N edits in one frame produce one batch with one recompute per distinct coordinate
    #[test]
    fn one_recompute_per_distinct_coordinate(edits in proptest::collection::vec((0i32..6, 0i32..6), 1..60)) {
        let mut d = DeferredWork::new();
        for &(x, y) in &edits {
            d.request_light(x, y);
            d.request_minimap_refresh();
        }
        let mut sink = Counts::default();
        let r = d.flush(16.0, &mut sink);

        let mut distinct = edits.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(r.lights, distinct.len());
        prop_assert!(r.lights <= edits.len());
        let mut seen = sink.lights.clone();
        seen.sort_unstable();
        prop_assert_eq!(seen, distinct);
        prop_assert_eq!(sink.minimap, 1);

        // nothing left to do on the next frame
        let again = d.flush(32.0, &mut sink);
        prop_assert!(again.is_empty());
    }

    // with a throttle, no two light batches are closer than the interval
    #[test]
    fn throttled_batches_respect_interval(frames in proptest::collection::vec((1.0f64..40.0, any::<bool>()), 1..120)) {
        let interval = 50.0;
        let mut d = DeferredWork::with_light_interval(interval);
        let mut sink = Counts::default();
        let mut now = 0.0;
        let mut last_batch: Option<f64> = None;
        for (gap, edit) in frames {
            now += gap;
            if edit {
                d.request_light((now as i32) % 7, 1);
            }
            let r = d.flush(now, &mut sink);
            if r.lights > 0 {
                if let Some(prev) = last_batch {
                    prop_assert!(now - prev >= interval);
                }
                last_batch = Some(now);
            }
        }
    }
}
