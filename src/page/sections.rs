/// Vertical extent of a section relative to the viewport top, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRect {
    pub top: f32,
    pub bottom: f32,
}

impl SectionRect {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    fn center(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// Result of a focus check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionFocus {
    /// Index of the section closest to the viewport center.
    pub active: usize,
    /// The active section differs from the previous check (or this is the first check).
    pub changed: bool,
    /// The change should be announced with the section sound.
    pub play_sound: bool,
}

/// Tracks which section is closest to the viewport center.
#[derive(Debug, Default, Clone)]
pub struct SectionTracker {
    active: Option<usize>,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the section whose center is closest to the viewport center. On ties the
    /// earlier section wins. Returns `None` when there are no sections.
    ///
    /// The first detection only records the section; the sound plays on later changes.
    pub fn update(
        &mut self,
        viewport_height: f32,
        sections: &[SectionRect],
    ) -> Option<SectionFocus> {
        let viewport_center = viewport_height / 2.0;

        let mut closest: Option<(usize, f32)> = None;
        for (index, rect) in sections.iter().enumerate() {
            let distance = (viewport_center - rect.center()).abs();
            if closest.is_none_or(|(_, best)| distance < best) {
                closest = Some((index, distance));
            }
        }
        let (active, _) = closest?;

        let previous = self.active.replace(active);
        let changed = previous != Some(active);
        let play_sound = changed && previous.is_some();
        if changed {
            log::debug!("Active section: {active}");
        }

        Some(SectionFocus {
            active,
            changed,
            play_sound,
        })
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(scroll: f32) -> Vec<SectionRect> {
        // Three 800px sections stacked from the page top.
        (0..3)
            .map(|i| {
                let top = i as f32 * 800.0 - scroll;
                SectionRect::new(top, top + 800.0)
            })
            .collect()
    }

    #[test]
    fn test_first_detection_is_silent() {
        let mut tracker = SectionTracker::new();
        let focus = tracker.update(800.0, &page(0.0)).unwrap();

        assert_eq!(focus.active, 0);
        assert!(focus.changed);
        assert!(!focus.play_sound);
    }

    #[test]
    fn test_change_plays_once() {
        let mut tracker = SectionTracker::new();
        tracker.update(800.0, &page(0.0));

        let focus = tracker.update(800.0, &page(700.0)).unwrap();
        assert_eq!(focus.active, 1);
        assert!(focus.play_sound);

        // Scrolling within the same section does not re-announce it.
        let focus = tracker.update(800.0, &page(760.0)).unwrap();
        assert_eq!(focus.active, 1);
        assert!(!focus.changed);
        assert!(!focus.play_sound);
    }

    #[test]
    fn test_no_sections() {
        let mut tracker = SectionTracker::new();
        assert_eq!(tracker.update(800.0, &[]), None);
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn test_tie_keeps_earlier_section() {
        let mut tracker = SectionTracker::new();
        let sections = [
            SectionRect::new(-400.0, 400.0),
            SectionRect::new(400.0, 1200.0),
        ];
        let focus = tracker.update(800.0, &sections).unwrap();
        assert_eq!(focus.active, 0);
    }
}
