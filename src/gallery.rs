//! Carousel index tracking shared by inline cards and the modal view.

pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Previous),
            "ArrowRight" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Current slide of a fixed-length carousel. Galleries with fewer than two
/// slides never move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GalleryState {
    len: usize,
    index: usize,
}

impl GalleryState {
    pub fn new(len: usize) -> Self {
        Self { len, index: 0 }
    }

    pub fn slide_count(&self) -> usize {
        self.len
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_navigable(&self) -> bool {
        self.len > 1
    }

    pub fn next(&mut self) {
        if self.is_navigable() {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn previous(&mut self) {
        if self.is_navigable() {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Previous => self.previous(),
            Direction::Next => self.next(),
        }
    }

    pub fn stepped(mut self, direction: Direction) -> Self {
        self.step(direction);
        self
    }

    pub fn track_style(&self) -> String {
        let offset = -100 * self.index as i64;
        format!("transform: translateX({offset}%); transition: transform 0.4s ease;")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwipeTracker {
    start_x: Option<f64>,
    last_x: Option<f64>,
}

impl SwipeTracker {
    pub fn start(&mut self, x: f64) {
        self.start_x = Some(x);
        self.last_x = None;
    }

    pub fn track(&mut self, x: f64) {
        if self.start_x.is_some() {
            self.last_x = Some(x);
        }
    }

    /// Ends the gesture. A leftward drag past the threshold means "next".
    pub fn finish(&mut self) -> Option<Direction> {
        let start = self.start_x.take()?;
        let last = self.last_x.take()?;
        swipe_direction(start - last)
    }
}

pub fn swipe_direction(delta: f64) -> Option<Direction> {
    if delta.abs() <= SWIPE_THRESHOLD_PX {
        return None;
    }

    if delta > 0.0 {
        Some(Direction::Next)
    } else {
        Some(Direction::Previous)
    }
}
