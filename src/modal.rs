//! The project modal: at most one card open, with its own carousel.

use crate::gallery::{Direction, GalleryState};
use crate::model::ProjectCard;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenModal {
    pub index: usize,
    /// Increments on every opening, so each one mounts a fresh view.
    pub opened: u32,
    pub gallery: GalleryState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalAction {
    Open { index: usize, gallery: GalleryState },
    Step(Direction),
    Close,
}

impl ModalAction {
    pub fn open(index: usize, card: &ProjectCard) -> Self {
        Self::Open {
            index,
            gallery: card.new_gallery(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModalState {
    current: Option<OpenModal>,
    openings: u32,
}

impl ModalState {
    pub fn current(&self) -> Option<OpenModal> {
        self.current
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Opening while open replaces the card.
    pub fn apply(self, action: ModalAction) -> Self {
        match action {
            ModalAction::Open { index, gallery } => {
                let openings = self.openings.wrapping_add(1);
                Self {
                    current: Some(OpenModal {
                        index,
                        opened: openings,
                        gallery,
                    }),
                    openings,
                }
            }
            ModalAction::Step(direction) => Self {
                current: self.current.map(|open| OpenModal {
                    gallery: open.gallery.stepped(direction),
                    ..open
                }),
                ..self
            },
            ModalAction::Close => Self { current: None, ..self },
        }
    }
}
