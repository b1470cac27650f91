use crate::components::{Notice, NoticeKind};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;
use yew::prelude::*;

/// Facial expression a sign video is tagged with.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Happy,
    Sad,
    Surprise,
    Neutral,
    Anger,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Happy,
        Category::Sad,
        Category::Surprise,
        Category::Neutral,
        Category::Anger,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Happy => "happy",
            Category::Sad => "sad",
            Category::Surprise => "surprise",
            Category::Neutral => "neutral",
            Category::Anger => "anger",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Happy => "Happy",
            Category::Sad => "Sad",
            Category::Surprise => "Surprise",
            Category::Neutral => "Neutral",
            Category::Anger => "Anger",
        }
    }
}

impl FromStr for Category {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UploadError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please fill out all fields.")]
    MissingFields,
    #[error("Unknown expression category '{0}'")]
    UnknownCategory(String),
}

pub const UPLOAD_SUCCESS: &str = "Video uploaded successfully!";
pub const UPLOAD_FAILURE: &str = "Error uploading video.";
pub const NOT_AUTHENTICATED: &str = "User is not authenticated";

/// Local form state prior to submission. `F` is the staged file handle.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadDraft<F> {
    pub file: Option<F>,
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
}

impl<F> Default for UploadDraft<F> {
    fn default() -> Self {
        Self {
            file: None,
            title: String::new(),
            description: String::new(),
            category: None,
        }
    }
}

/// A draft that passed validation, ready to be packed into a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission<F> {
    pub file: F,
    pub title: String,
    pub description: String,
    pub category: Category,
}

impl<F: Clone> UploadDraft<F> {
    pub fn submission(&self) -> Result<Submission<F>, UploadError> {
        match (&self.file, &self.category) {
            (Some(file), Some(category))
                if !self.title.is_empty() && !self.description.is_empty() =>
            {
                Ok(Submission {
                    file: file.clone(),
                    title: self.title.clone(),
                    description: self.description.clone(),
                    category: *category,
                })
            }
            _ => Err(UploadError::MissingFields),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Staged,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm<F> {
    pub draft: UploadDraft<F>,
    pub uploading: bool,
    pub message: Option<Notice>,
}

impl<F> Default for UploadForm<F> {
    fn default() -> Self {
        Self {
            draft: UploadDraft::default(),
            uploading: false,
            message: None,
        }
    }
}

pub enum UploadAction<F> {
    Stage(F),
    Title(String),
    Description(String),
    Category(Option<Category>),
    Unauthenticated,
    Rejected(UploadError),
    Started,
    Succeeded,
    Failed(String),
}

impl<F> UploadForm<F> {
    pub fn phase(&self) -> UploadPhase {
        if self.uploading {
            UploadPhase::Submitting
        } else if self.draft.file.is_some() {
            UploadPhase::Staged
        } else {
            UploadPhase::Idle
        }
    }

    pub fn apply(&mut self, action: UploadAction<F>) {
        match action {
            UploadAction::Stage(file) => self.draft.file = Some(file),
            UploadAction::Title(title) => self.draft.title = title,
            UploadAction::Description(description) => self.draft.description = description,
            UploadAction::Category(category) => self.draft.category = category,
            UploadAction::Unauthenticated => {
                self.message = Some(Notice::error(NOT_AUTHENTICATED));
            }
            UploadAction::Rejected(error) => {
                self.message = Some(Notice::error(error.to_string()));
            }
            UploadAction::Started => {
                self.uploading = true;
                self.message = None;
            }
            UploadAction::Succeeded => {
                self.draft = UploadDraft::default();
                self.uploading = false;
                self.message = Some(Notice::success(UPLOAD_SUCCESS));
            }
            UploadAction::Failed(message) => {
                self.uploading = false;
                self.message = Some(Notice::error(message));
            }
        }
    }

    pub fn message_is_error(&self) -> bool {
        matches!(
            self.message,
            Some(Notice {
                kind: NoticeKind::Error,
                ..
            })
        )
    }
}

impl<F: Clone + PartialEq> Reducible for UploadForm<F> {
    type Action = UploadAction<F>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        next.into()
    }
}

/// Drop zone filter: only `video/*` files are staged.
pub fn is_video_mime(mime: &str) -> bool {
    mime.starts_with("video/")
}
