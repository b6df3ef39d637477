//! Geometry behind the page-shell effects: scroll thresholds, parallax,
//! anchor offsets, the eased cursor follower and the view-toggle slider.

pub const NAVBAR_SCROLL_THRESHOLD: f64 = 100.0;
pub const SCROLL_HINT_THRESHOLD: f64 = 50.0;
pub const NAV_BREAKPOINT: f64 = 768.0;
pub const CURSOR_MIN_VIEWPORT: f64 = 1024.0;
pub const ANCHOR_OFFSET: f64 = 80.0;
pub const CURSOR_EASING: f64 = 0.15;
const PARALLAX_BASE_SPEED: f64 = 0.5;
const PARALLAX_SPEED_STEP: f64 = 0.1;

pub fn navbar_scrolled(scroll_y: f64) -> bool {
    scroll_y > NAVBAR_SCROLL_THRESHOLD
}

pub fn scroll_hint_hidden(scroll_y: f64) -> bool {
    scroll_y > SCROLL_HINT_THRESHOLD
}

pub fn is_narrow_viewport(width: f64) -> bool {
    width < NAV_BREAKPOINT
}

pub fn cursor_enabled(width: f64) -> bool {
    width >= CURSOR_MIN_VIEWPORT
}

/// Selector for an in-page anchor, or `None` for a bare `#`.
pub fn anchor_selector(href: &str) -> Option<&str> {
    if href.len() <= 1 || !href.starts_with('#') {
        return None;
    }

    Some(href)
}

pub fn anchor_scroll_top(target_offset_top: f64) -> f64 {
    target_offset_top - ANCHOR_OFFSET
}

/// Vertical translation of the `index`-th decoration blob.
pub fn parallax_offset(scroll_y: f64, index: usize) -> f64 {
    let speed = PARALLAX_BASE_SPEED + index as f64 * PARALLAX_SPEED_STEP;
    -(scroll_y * speed)
}

pub fn translate_y(offset: f64) -> String {
    format!("translateY({offset}px)")
}

/// Width style for a skill bar, from its `data-progress` attribute.
pub fn skill_width(progress: &str) -> Option<String> {
    let value = progress.trim().trim_end_matches('%').parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(format!("{}%", value.clamp(0.0, 100.0)))
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorFollower {
    pub x: f64,
    pub y: f64,
    target_x: f64,
    target_y: f64,
}

impl CursorFollower {
    pub fn aim(&mut self, x: f64, y: f64) {
        self.target_x = x;
        self.target_y = y;
    }

    /// One animation frame of easing toward the pointer.
    pub fn step(&mut self) {
        self.x += (self.target_x - self.x) * CURSOR_EASING;
        self.y += (self.target_y - self.y) * CURSOR_EASING;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SliderGeometry {
    pub fn measure(container: Rect, button: Rect) -> Self {
        Self {
            left: button.left - container.left,
            top: button.top - container.top,
            width: button.width,
            height: button.height,
        }
    }

    pub fn css_variables(&self) -> [(&'static str, String); 4] {
        [
            ("--slider-left", format!("{}px", self.left)),
            ("--slider-width", format!("{}px", self.width)),
            ("--slider-height", format!("{}px", self.height)),
            ("--slider-top", format!("{}px", self.top)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_thresholds_are_exclusive() {
        assert!(!navbar_scrolled(100.0));
        assert!(navbar_scrolled(100.5));
        assert!(!scroll_hint_hidden(50.0));
        assert!(scroll_hint_hidden(51.0));
    }

    #[test]
    fn breakpoints_split_narrow_and_wide() {
        assert!(is_narrow_viewport(767.0));
        assert!(!is_narrow_viewport(768.0));
        assert!(!cursor_enabled(1023.0));
        assert!(cursor_enabled(1024.0));
    }

    #[test]
    fn bare_hash_is_not_an_anchor() {
        assert_eq!(anchor_selector("#"), None);
        assert_eq!(anchor_selector(""), None);
        assert_eq!(anchor_selector("#contact"), Some("#contact"));
        assert_eq!(anchor_scroll_top(500.0), 420.0);
    }

    #[test]
    fn parallax_speed_grows_per_element() {
        assert_eq!(parallax_offset(100.0, 0), -50.0);
        assert!((parallax_offset(100.0, 2) + 70.0).abs() < 1e-9);
        assert_eq!(translate_y(-50.0), "translateY(-50px)");
    }

    #[test]
    fn skill_width_is_clamped_percentage() {
        assert_eq!(skill_width("85").as_deref(), Some("85%"));
        assert_eq!(skill_width("120%").as_deref(), Some("100%"));
        assert_eq!(skill_width("lots"), None);
    }

    #[test]
    fn cursor_eases_toward_pointer() {
        let mut cursor = CursorFollower::default();
        cursor.aim(100.0, 200.0);
        cursor.step();
        assert!((cursor.x - 15.0).abs() < 1e-9);
        assert!((cursor.y - 30.0).abs() < 1e-9);

        for _ in 0..200 {
            cursor.step();
        }
        assert!((cursor.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn slider_is_positioned_relative_to_container() {
        let geometry = SliderGeometry::measure(
            Rect { left: 100.0, top: 40.0, width: 200.0, height: 48.0 },
            Rect { left: 196.0, top: 44.0, width: 96.0, height: 40.0 },
        );

        assert_eq!(geometry.left, 96.0);
        assert_eq!(geometry.top, 4.0);
        assert_eq!(geometry.css_variables()[0], ("--slider-left", "96px".to_string()));
    }
}
