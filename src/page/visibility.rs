/// Visibility of the floating call-to-action button.
///
/// The button hides once the footer top rises above the button's slot at the bottom of the
/// viewport, so it never covers the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtaVisibility {
    visible: bool,
}

impl Default for CtaVisibility {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl CtaVisibility {
    /// Recomputes visibility. Returns `true` when it changed.
    pub fn check(&mut self, footer_top: f32, viewport_height: f32, button_height: f32) -> bool {
        let visible = footer_top >= viewport_height - button_height;
        let changed = visible != self.visible;
        self.visible = visible;
        changed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Inline style applied to the button wrapper: `(opacity, pointer-events)`.
    pub fn style(&self) -> (&'static str, &'static str) {
        if self.visible {
            ("1", "auto")
        } else {
            ("0", "none")
        }
    }
}
