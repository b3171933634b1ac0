/// Cursor over a non-empty deck that wraps at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideNavigator {
    index: usize,
    len: usize,
}

impl SlideNavigator {
    /// `None` for an empty deck.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { index: 0, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = (self.index + self.len - 1) % self.len;
        self.index
    }

    pub fn go_first(&mut self) {
        self.index = 0;
    }

    pub fn go_last(&mut self) {
        self.index = self.len - 1;
    }

    /// "slide i of N", 1-based.
    pub fn position_label(&self) -> String {
        format!("slide {} of {}", self.index + 1, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_deck_has_no_navigator() {
        assert!(SlideNavigator::new(0).is_none());
    }

    #[test]
    fn test_wraps_both_ways() {
        let mut nav = SlideNavigator::new(11).unwrap();
        assert_eq!(nav.position_label(), "slide 1 of 11");
        assert_eq!(nav.prev(), 10);
        assert!(nav.is_last());
        assert_eq!(nav.next(), 0);
        assert!(nav.is_first());

        nav.go_last();
        assert_eq!(nav.position_label(), "slide 11 of 11");
        nav.go_first();
        assert_eq!(nav.index(), 0);
    }

    #[test]
    fn test_single_slide_stays_put() {
        let mut nav = SlideNavigator::new(1).unwrap();
        assert_eq!(nav.next(), 0);
        assert_eq!(nav.prev(), 0);
    }

    #[test]
    fn test_index_stays_in_range() {
        let mut nav = SlideNavigator::new(3).unwrap();
        for step in 0..10 {
            if step % 3 == 0 {
                nav.prev();
            } else {
                nav.next();
            }
            assert!(nav.index() < nav.len());
        }
    }
}
