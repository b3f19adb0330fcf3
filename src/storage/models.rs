use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Entity, Persistence, Repository};

/// Three-state patch value for partial updates of nullable columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    /// Field was not included in the request (no change).
    #[default]
    Absent,
    /// Field was explicitly set to null (clear it).
    Null,
    /// Field was set to a new value.
    Value(T),
}

impl<T> From<Option<Option<T>>> for Patch<T> {
    fn from(v: Option<Option<T>>) -> Self {
        match v {
            None => Patch::Absent,
            Some(None) => Patch::Null,
            Some(Some(v)) => Patch::Value(v),
        }
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Apply onto a nullable field, leaving it untouched when absent.
    pub fn merge_into(self, field: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *field = None,
            Patch::Value(v) => *field = Some(v),
        }
    }

    /// The value to write, or `None` when the field is absent.
    pub fn into_assignment(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

/// Deserializes a present key into `Null` or `Value`; pair with
/// `#[serde(default)]` so a missing key stays `Absent`.
fn patch<'de, T, D>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    Ok(Patch::from(Some(Option::deserialize(deserializer)?)))
}

fn default_views() -> i32 {
    0
}

fn default_published() -> bool {
    true
}

// ============================================================================
// Photo
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub filename: String,
    pub views: i32,
    pub is_published: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhoto {
    pub name: String,
    pub description: String,
    pub filename: String,
    #[serde(default = "default_views")]
    pub views: i32,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub views: Option<i32>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

impl PhotoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.filename.is_none()
            && self.views.is_none()
            && self.is_published.is_none()
    }
}

impl Entity for Photo {
    type New = NewPhoto;
    type Patch = PhotoPatch;

    const NAME: &'static str = "Photo";
    const COLLECTION: &'static str = "photos";
    const TABLE: &'static str = "photo";

    fn id(&self) -> i32 {
        self.id
    }

    fn create(id: i32, new: NewPhoto) -> Self {
        Photo {
            id,
            name: new.name,
            description: new.description,
            filename: new.filename,
            views: new.views,
            is_published: new.is_published,
        }
    }

    fn apply(&mut self, patch: PhotoPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(filename) = patch.filename {
            self.filename = filename;
        }
        if let Some(views) = patch.views {
            self.views = views;
        }
        if let Some(is_published) = patch.is_published {
            self.is_published = is_published;
        }
    }

    fn repository(persistence: &Persistence) -> &dyn Repository<Self> {
        persistence.photos()
    }
}

// ============================================================================
// Video
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub filename: String,
    pub views: i32,
    pub is_published: bool,
    /// Length in seconds, when known.
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVideo {
    pub name: String,
    pub description: String,
    pub filename: String,
    #[serde(default = "default_views")]
    pub views: i32,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default)]
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub views: Option<i32>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default, deserialize_with = "patch")]
    pub duration: Patch<i32>,
}

impl VideoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.filename.is_none()
            && self.views.is_none()
            && self.is_published.is_none()
            && self.duration.is_absent()
    }
}

impl Entity for Video {
    type New = NewVideo;
    type Patch = VideoPatch;

    const NAME: &'static str = "Video";
    const COLLECTION: &'static str = "videos";
    const TABLE: &'static str = "video";

    fn id(&self) -> i32 {
        self.id
    }

    fn create(id: i32, new: NewVideo) -> Self {
        Video {
            id,
            name: new.name,
            description: new.description,
            filename: new.filename,
            views: new.views,
            is_published: new.is_published,
            duration: new.duration,
        }
    }

    fn apply(&mut self, patch: VideoPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(filename) = patch.filename {
            self.filename = filename;
        }
        if let Some(views) = patch.views {
            self.views = views;
        }
        if let Some(is_published) = patch.is_published {
            self.is_published = is_published;
        }
        patch.duration.merge_into(&mut self.duration);
    }

    fn repository(persistence: &Persistence) -> &dyn Repository<Self> {
        persistence.videos()
    }
}
