/// A chat screenshot shown after a testimonial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    /// 1-based position of the testimonial this screenshot follows.
    pub position: usize,
    pub src: String,
    pub alt: String,
}

impl Screenshot {
    pub fn new(position: usize, src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            position,
            src: src.into(),
            alt: alt.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slide {
    /// Index of the testimonial in page order.
    Testimonial(usize),
    Screenshot(Screenshot),
}

/// Testimonial carousel with screenshots interleaved after their testimonial.
#[derive(Debug, Clone)]
pub struct TestimonialSlider {
    slides: Vec<Slide>,
    current: usize,
}

impl TestimonialSlider {
    /// Builds the slide list. Screenshots keep their configured order within a position;
    /// screenshots pointing past the last testimonial are dropped.
    ///
    /// Returns `None` when the page has no testimonials.
    pub fn new(testimonials: usize, screenshots: &[Screenshot]) -> Option<Self> {
        if testimonials == 0 {
            return None;
        }

        let mut slides = Vec::with_capacity(testimonials + screenshots.len());
        for index in 0..testimonials {
            slides.push(Slide::Testimonial(index));
            slides.extend(
                screenshots
                    .iter()
                    .filter(|shot| shot.position == index + 1)
                    .cloned()
                    .map(Slide::Screenshot),
            );
        }

        Some(Self { slides, current: 0 })
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.slides.len();
        self.current
    }

    pub fn prev(&mut self) -> usize {
        self.current = (self.current + self.slides.len() - 1) % self.slides.len();
        self.current
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Whether the slide at `index` carries the active class.
    pub fn is_active(&self, index: usize) -> bool {
        index == self.current
    }

    pub fn screenshot(&self, index: usize) -> Option<&Screenshot> {
        match self.slides.get(index) {
            Some(Slide::Screenshot(shot)) => Some(shot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shots() -> Vec<Screenshot> {
        vec![
            Screenshot::new(1, "imagens/print1.png", "Chat screenshot 1"),
            Screenshot::new(1, "imagens/print1a.png", "Chat screenshot 1A"),
            Screenshot::new(2, "imagens/print2.png", "Chat screenshot 2"),
            Screenshot::new(9, "imagens/print9.png", "Orphan"),
        ]
    }

    #[test]
    fn test_screenshots_follow_their_testimonial() {
        let slider = TestimonialSlider::new(3, &shots()).unwrap();
        let order: Vec<String> = slider
            .slides()
            .iter()
            .map(|slide| match slide {
                Slide::Testimonial(index) => format!("t{index}"),
                Slide::Screenshot(shot) => shot.src.clone(),
            })
            .collect();

        assert_eq!(
            order,
            vec![
                "t0",
                "imagens/print1.png",
                "imagens/print1a.png",
                "t1",
                "imagens/print2.png",
                "t2",
            ]
        );
    }

    #[test]
    fn test_navigation_wraps() {
        let mut slider = TestimonialSlider::new(2, &[]).unwrap();
        assert_eq!(slider.prev(), 1);
        assert_eq!(slider.next(), 0);
        assert_eq!(slider.next(), 1);
        assert_eq!(slider.next(), 0);
        assert!(slider.is_active(0));
        assert!(!slider.is_active(1));
    }

    #[test]
    fn test_no_testimonials() {
        assert!(TestimonialSlider::new(0, &shots()).is_none());
    }

    #[test]
    fn test_screenshot_lookup() {
        let slider = TestimonialSlider::new(1, &shots()).unwrap();
        assert_eq!(slider.screenshot(0), None);
        assert_eq!(
            slider.screenshot(1).map(|shot| shot.alt.as_str()),
            Some("Chat screenshot 1")
        );
        assert_eq!(slider.current_slide(), &Slide::Testimonial(0));
    }
}
