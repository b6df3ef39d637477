//! Project records as stored in `projects.json` and the card view-model built
//! from them. A card is rendered twice (inline and inside the modal), so it
//! owns no interactive state; each view creates its own [`GalleryState`].

use crate::gallery::GalleryState;
use crate::i18n::{Language, TranslationStore};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// A field that is either one value for every language or one value per
/// language code.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Localized<T> {
    Plain(T),
    PerLanguage(HashMap<String, T>),
}

/// Values that count as missing when picking a per-language variant.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for Vec<String> {
    fn is_present(&self) -> bool {
        true
    }
}

impl<T: Presence> Localized<T> {
    /// Active language first, then Spanish.
    pub fn resolve(&self, language: Language) -> Option<&T> {
        match self {
            Self::Plain(value) => Some(value),
            Self::PerLanguage(values) => [language, Language::Es]
                .into_iter()
                .find_map(|candidate| values.get(candidate.as_str()).filter(|value| value.is_present())),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ProjectLinks {
    #[serde(default)]
    pub demo: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub code_back: Option<String>,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ProjectRecord {
    #[serde(default)]
    pub title: Option<Localized<String>>,
    #[serde(default)]
    pub description: Option<Localized<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stack: Vec<String>,
    #[serde(default)]
    pub features: Option<Localized<Vec<String>>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: ProjectLinks,
}

/// `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub fn parse_projects(raw: &str) -> Result<Vec<ProjectRecord>, serde_json::Error> {
    serde_json::from_str(raw)
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|value| !value.is_empty()).cloned()
}

/// UI strings a card needs, resolved once per language.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLabels {
    pub untitled: String,
    pub capture: String,
    pub no_images: String,
    pub empty_list: String,
    pub previous_image: String,
    pub next_image: String,
    pub demo: String,
    pub code: String,
    pub code_back: String,
    pub doc: String,
    pub video: String,
}

impl CardLabels {
    pub fn defaults(language: Language) -> Self {
        match language {
            Language::Es => Self {
                untitled: "Proyecto".to_string(),
                capture: "Captura".to_string(),
                no_images: "Sin imágenes disponibles".to_string(),
                empty_list: "No hay proyectos disponibles.".to_string(),
                previous_image: "Imagen anterior".to_string(),
                next_image: "Siguiente imagen".to_string(),
                demo: "Ver Demo".to_string(),
                code: "Ver Código".to_string(),
                code_back: "Código Backend".to_string(),
                doc: "Documentación".to_string(),
                video: "Ver Video".to_string(),
            },
            Language::En => Self {
                untitled: "Project".to_string(),
                capture: "Screenshot".to_string(),
                no_images: "No images available".to_string(),
                empty_list: "No projects available.".to_string(),
                previous_image: "Previous image".to_string(),
                next_image: "Next image".to_string(),
                demo: "View Demo".to_string(),
                code: "View Code".to_string(),
                code_back: "Backend Code".to_string(),
                doc: "Documentation".to_string(),
                video: "Watch Video".to_string(),
            },
        }
    }

    pub fn resolve(store: &TranslationStore, language: Language) -> Self {
        let defaults = Self::defaults(language);
        let text = |path: &str, fallback: &str| store.text_or(language, path, fallback);

        Self {
            untitled: text("projects.untitled", &defaults.untitled),
            capture: text("projects.capture", &defaults.capture),
            no_images: text("projects.no_images", &defaults.no_images),
            empty_list: text("projects.empty", &defaults.empty_list),
            previous_image: text("projects.previous_image", &defaults.previous_image),
            next_image: text("projects.next_image", &defaults.next_image),
            demo: text("projects.btn_demo", &defaults.demo),
            code: text("projects.btn_code", &defaults.code),
            code_back: text("projects.btn_code_back", &defaults.code_back),
            doc: text("projects.btn_doc", &defaults.doc),
            video: text("projects.btn_video", &defaults.video),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slide {
    pub src: String,
    pub alt: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CardMedia {
    Video { src: String, poster: Option<String> },
    Gallery { slides: Vec<Slide> },
    Placeholder { message: String },
}

impl CardMedia {
    pub fn slide_count(&self) -> usize {
        match self {
            Self::Gallery { slides } => slides.len(),
            Self::Video { .. } | Self::Placeholder { .. } => 0,
        }
    }

    /// Whether previous/next controls are rendered visible.
    pub fn has_navigation(&self) -> bool {
        self.slide_count() > 1
    }

    pub fn has_gallery_controls(&self) -> bool {
        !matches!(self, Self::Video { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    Demo,
    Code,
    CodeBack,
    Doc,
    Video,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardLink {
    pub kind: LinkKind,
    pub href: String,
    pub label: String,
}

impl CardLink {
    pub fn class_name(&self) -> &'static str {
        match self.kind {
            LinkKind::Demo => "btn btn-primary",
            _ => "btn btn-secondary",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectCard {
    pub title: String,
    pub description: String,
    pub media: CardMedia,
    pub stack: Vec<String>,
    pub features: Vec<String>,
    pub links: Vec<CardLink>,
    pub labels: CardLabels,
}

impl ProjectCard {
    pub fn build(record: &ProjectRecord, language: Language, labels: &CardLabels) -> Self {
        let title = record
            .title
            .as_ref()
            .and_then(|title| title.resolve(language))
            .filter(|title| !title.is_empty())
            .cloned()
            .unwrap_or_else(|| labels.untitled.clone());
        let description = record
            .description
            .as_ref()
            .and_then(|description| description.resolve(language))
            .cloned()
            .unwrap_or_default();
        let features = record
            .features
            .as_ref()
            .and_then(|features| features.resolve(language))
            .cloned()
            .unwrap_or_default();

        let media = match non_empty(record.video.as_ref()) {
            Some(src) => CardMedia::Video {
                src,
                poster: record.images.first().cloned(),
            },
            None if record.images.is_empty() => CardMedia::Placeholder {
                message: labels.no_images.clone(),
            },
            None => CardMedia::Gallery {
                slides: record
                    .images
                    .iter()
                    .enumerate()
                    .map(|(index, src)| Slide {
                        src: src.clone(),
                        alt: format!("{title} - {} {}", labels.capture, index + 1),
                    })
                    .collect(),
            },
        };

        let links = [
            (LinkKind::Demo, &record.links.demo, &labels.demo),
            (LinkKind::Code, &record.links.code, &labels.code),
            (LinkKind::CodeBack, &record.links.code_back, &labels.code_back),
            (LinkKind::Doc, &record.links.doc, &labels.doc),
            (LinkKind::Video, &record.links.video, &labels.video),
        ]
        .into_iter()
        .filter_map(|(kind, href, label)| {
            non_empty(href.as_ref()).map(|href| CardLink {
                kind,
                href,
                label: label.clone(),
            })
        })
        .collect();

        Self {
            title,
            description,
            media,
            stack: record.stack.clone(),
            features,
            links,
            labels: labels.clone(),
        }
    }

    /// Fresh carousel state for one rendered view of this card.
    pub fn new_gallery(&self) -> GalleryState {
        GalleryState::new(self.media.slide_count())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProjectListView {
    Placeholder(String),
    Cards(Vec<ProjectCard>),
}

pub fn project_list_view(records: &[ProjectRecord], language: Language, labels: &CardLabels) -> ProjectListView {
    if records.is_empty() {
        return ProjectListView::Placeholder(labels.empty_list.clone());
    }

    ProjectListView::Cards(
        records
            .iter()
            .map(|record| ProjectCard::build(record, language, labels))
            .collect(),
    )
}
