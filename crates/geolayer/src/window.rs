/// Integer pixel rectangle relative to the native raster origin of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub xoff: i64,
    pub yoff: i64,
    pub xsize: i64,
    pub ysize: i64,
}

impl Window {
    pub const fn new(xoff: i64, yoff: i64, xsize: i64, ysize: i64) -> Self {
        Window { xoff, yoff, xsize, ysize }
    }

    /// Window covering a complete raster of the given dimensions
    pub const fn full(width: i64, height: i64) -> Self {
        Window::new(0, 0, width, height)
    }

    pub fn is_empty(&self) -> bool {
        self.xsize <= 0 || self.ysize <= 0
    }

    pub fn pixel_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.xsize as usize * self.ysize as usize
        }
    }

    /// Moves the window by the origin of `parent`, converting a window relative to `parent` into the coordinates `parent` is expressed in.
    /// Offsets saturate, a saturated window never fits within a raster.
    pub fn offset_by(&self, parent: &Window) -> Window {
        Window::new(
            self.xoff.saturating_add(parent.xoff),
            self.yoff.saturating_add(parent.yoff),
            self.xsize,
            self.ysize,
        )
    }

    /// True when the window starts inside a raster of `width` x `height` pixels and does not read past its edges.
    pub fn fits_within(&self, width: i64, height: i64) -> bool {
        self.xoff >= 0
            && self.yoff >= 0
            && self.xsize >= 0
            && self.ysize >= 0
            && self.xoff.checked_add(self.xsize).is_some_and(|right| right <= width)
            && self.yoff.checked_add(self.ysize).is_some_and(|bottom| bottom <= height)
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Window(offset: ({}, {}), size: {}x{})", self.xoff, self.yoff, self.xsize, self.ysize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds() {
        let window = Window::new(10, 5, 90, 45);
        assert!(window.fits_within(100, 50));
        assert!(!window.fits_within(99, 50));
        assert!(!window.fits_within(100, 49));
        assert!(!Window::new(-1, 0, 10, 10).fits_within(100, 100));
        assert_eq!(window.pixel_count(), 90 * 45);
    }

    #[test]
    fn window_offset() {
        let parent = Window::new(10, 20, 50, 50);
        let region = Window::new(1, 2, 3, 4);
        assert_eq!(region.offset_by(&parent), Window::new(11, 22, 3, 4));
    }

    #[test]
    fn huge_windows_do_not_fit() {
        assert!(!Window::new(5, 0, i64::MAX, 50).fits_within(100, 50));
        assert!(!Window::new(0, i64::MAX, 10, 1).fits_within(100, 50));

        let moved = Window::new(i64::MAX, 0, 1, 1).offset_by(&Window::new(10, 0, 1, 1));
        assert_eq!(moved.xoff, i64::MAX);
        assert!(!moved.fits_within(100, 50));
    }

    #[test]
    fn empty_window() {
        assert!(Window::new(0, 0, 0, 10).is_empty());
        assert!(Window::new(0, 0, 10, 0).is_empty());
        assert!(!Window::full(1, 1).is_empty());
        assert_eq!(Window::new(0, 0, 0, 10).pixel_count(), 0);
    }
}
