//! Generated-image values and the fallback rules consumers render with.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::ImagePayload;

// ---------------------------------------------------------------------------
// Data URIs
// ---------------------------------------------------------------------------

/// Build a `data:` URI from a MIME type and an already base64-encoded body.
pub fn data_uri(mime_type: &str, base64_data: &str) -> ImagePayload {
    format!("data:{mime_type};base64,{base64_data}")
}

// ---------------------------------------------------------------------------
// Product slots
// ---------------------------------------------------------------------------

/// Which of a product's two generated images a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSlot {
    Main,
    Texture,
}

impl ProductSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Texture => "texture",
        }
    }
}

/// Cached imagery for one product. Each slot fills independently.
///
/// The persisted form always carries `main` (an empty string when absent)
/// and omits an absent `texture`. Empty strings read back as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImages {
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub main: Option<ImagePayload>,

    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub texture: Option<ImagePayload>,
}

impl ProductImages {
    /// A value with only `slot` filled.
    pub fn with_slot(slot: ProductSlot, payload: ImagePayload) -> Self {
        let mut images = Self::default();
        images.set(slot, payload);
        images
    }

    pub fn get(&self, slot: ProductSlot) -> Option<&ImagePayload> {
        match slot {
            ProductSlot::Main => self.main.as_ref(),
            ProductSlot::Texture => self.texture.as_ref(),
        }
    }

    pub fn set(&mut self, slot: ProductSlot, payload: ImagePayload) {
        match slot {
            ProductSlot::Main => self.main = Some(payload),
            ProductSlot::Texture => self.texture = Some(payload),
        }
    }

    pub fn has(&self, slot: ProductSlot) -> bool {
        self.get(slot).is_some()
    }

    /// Overlay the filled slots of `update`; slots it leaves empty keep
    /// their current value.
    pub fn overlay(&mut self, update: ProductImages) {
        if let Some(main) = update.main {
            self.main = Some(main);
        }
        if let Some(texture) = update.texture {
            self.texture = Some(texture);
        }
    }

    /// Main image to render: the generated one, else the static fallback.
    pub fn main_or<'a>(images: Option<&'a ProductImages>, fallback: &'a str) -> &'a str {
        images
            .and_then(|i| i.main.as_deref())
            .unwrap_or(fallback)
    }
}

/// Category image to render: the generated one, else the static fallback.
pub fn category_image_or<'a>(cached: Option<&'a ImagePayload>, fallback: &'a str) -> &'a str {
    match cached {
        Some(img) if !img.is_empty() => img,
        _ => fallback,
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn none_as_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_format() {
        assert_eq!(data_uri("image/png", "AAAA"), "data:image/png;base64,AAAA");
    }

    #[test]
    fn overlay_keeps_existing_slots() {
        let mut images = ProductImages::with_slot(ProductSlot::Main, "m".into());
        images.overlay(ProductImages::with_slot(ProductSlot::Texture, "t".into()));
        assert_eq!(images.main.as_deref(), Some("m"));
        assert_eq!(images.texture.as_deref(), Some("t"));

        images.overlay(ProductImages::default());
        assert_eq!(images.main.as_deref(), Some("m"));
    }

    #[test]
    fn empty_main_reads_back_as_absent() {
        let images: ProductImages =
            serde_json::from_str(r#"{"main":"","texture":"data:x"}"#).unwrap();
        assert!(!images.has(ProductSlot::Main));
        assert!(images.has(ProductSlot::Texture));
    }

    #[test]
    fn absent_main_persists_as_empty_string() {
        let images = ProductImages::with_slot(ProductSlot::Texture, "t".into());
        let json = serde_json::to_value(&images).unwrap();
        assert_eq!(json["main"], "");
        assert_eq!(json["texture"], "t");

        let json = serde_json::to_value(ProductImages::default()).unwrap();
        assert!(json.get("texture").is_none());
    }

    #[test]
    fn fallback_used_when_nothing_cached() {
        assert_eq!(ProductImages::main_or(None, "https://x/p.jpg"), "https://x/p.jpg");
        let images = ProductImages::with_slot(ProductSlot::Texture, "t".into());
        assert_eq!(ProductImages::main_or(Some(&images), "fb"), "fb");
        let images = ProductImages::with_slot(ProductSlot::Main, "gen".into());
        assert_eq!(ProductImages::main_or(Some(&images), "fb"), "gen");

        let cached = String::from("data:c");
        assert_eq!(category_image_or(Some(&cached), "fb"), "data:c");
        assert_eq!(category_image_or(None, "fb"), "fb");
        assert_eq!(category_image_or(Some(&String::new()), "fb"), "fb");
    }
}
