/// Axis-aligned integer rectangle: origin plus width and height.
///
/// Coordinates may be negative (a window dragged past the top-left
/// edge of the primary screen has negative origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn size(&self) -> Size {
        Size { w: self.w, h: self.h }
    }
}

/// Integer width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Scales this size so its larger dimension equals `target` pixels,
    /// preserving the aspect ratio. The smaller dimension truncates
    /// toward zero. Used for thumbnail sizing.
    pub fn fit(self, target: i32) -> Size {
        let aspect = self.w as f64 / self.h as f64;

        if self.w >= self.h && self.w != target {
            Size {
                w: target,
                h: (target as f64 / aspect) as i32,
            }
        } else if self.h > self.w && self.h != target {
            Size {
                w: (target as f64 * aspect) as i32,
                h: target,
            }
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_portrait() {
        assert_eq!(Size::new(100, 200).fit(20), Size::new(10, 20));
    }

    #[test]
    fn fit_landscape() {
        assert_eq!(Size::new(1600, 1200).fit(96), Size::new(96, 72));
        assert_eq!(Size::new(1024, 768).fit(800), Size::new(800, 600));
    }

    #[test]
    fn fit_already_at_target() {
        assert_eq!(Size::new(96, 72).fit(96), Size::new(96, 72));
    }

    #[test]
    fn fit_square() {
        assert_eq!(Size::new(50, 50).fit(100), Size::new(100, 100));
    }

    #[test]
    fn rect_size() {
        assert_eq!(Rect::new(-42, 43, 44, 45).size(), Size::new(44, 45));
    }
}
