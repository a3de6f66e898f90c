//! Site-wide content: biography, contact details and legal pages.
//!
//! Stored as one row with a JSON document per section. Updates are applied
//! as JSON merge patches, then re-parsed into the typed sections below so
//! defaults and validation apply uniformly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Timestamp;

pub const MAX_BIOGRAPHY_LENGTH: usize = 5000;

pub const DEFAULT_BIOGRAPHY_TITLE: &str = "Biografía";
pub const DEFAULT_BIOGRAPHY_CONTENT: &str = "Información biográfica pendiente de actualizar.";
pub const DEFAULT_CONTACT_EMAIL: &str = "contacto@ejemplo.com";
pub const DEFAULT_PROFILE_ALT: &str = "Foto de perfil del artista";
pub const DEFAULT_PRIVACY_TITLE: &str = "Política de Privacidad";
pub const DEFAULT_TERMS_TITLE: &str = "Términos y Condiciones";

/// Recorded as `updated_by` when no user is attached to a change.
pub const SYSTEM_UPDATER: &str = "System";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default = "default_profile_alt")]
    pub alt: String,
}

impl Default for ProfileImage {
    fn default() -> Self {
        Self {
            url: None,
            public_id: None,
            alt: default_profile_alt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub year: i32,
    pub achievement: String,
    #[serde(default)]
    pub images: Vec<MediaRef>,
    #[serde(default)]
    pub external_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exhibition {
    pub year: i32,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<MediaRef>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub catalog_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub year: i32,
    pub title: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub images: Vec<MediaRef>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biography {
    #[serde(default = "default_biography_title")]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default = "default_biography_content")]
    pub content: String,
    #[serde(default)]
    pub profile_image: ProfileImage,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub exhibitions: Vec<Exhibition>,
    #[serde(default)]
    pub awards: Vec<Award>,
}

impl Default for Biography {
    fn default() -> Self {
        Self {
            title: default_biography_title(),
            subtitle: None,
            content: default_biography_content(),
            profile_image: ProfileImage::default(),
            highlights: Vec::new(),
            exhibitions: Vec::new(),
            awards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl Default for PostalAddress {
    fn default() -> Self {
        Self {
            street: None,
            city: None,
            province: None,
            country: default_country(),
            postal_code: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default = "default_contact_email")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub address: PostalAddress,
    /// Network name to profile URL (instagram, facebook, ...).
    #[serde(default)]
    pub social_media: serde_json::Map<String, Value>,
    #[serde(default)]
    pub business_hours: Option<Value>,
    #[serde(default)]
    pub map_location: Option<Value>,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            email: default_contact_email(),
            phone: None,
            whatsapp: None,
            address: PostalAddress::default(),
            social_media: serde_json::Map::new(),
            business_hours: None,
            map_location: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalPage {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalPages {
    #[serde(default = "default_privacy")]
    pub privacy_policy: LegalPage,
    #[serde(default = "default_terms")]
    pub terms_and_conditions: LegalPage,
}

impl Default for LegalPages {
    fn default() -> Self {
        Self {
            privacy_policy: default_privacy(),
            terms_and_conditions: default_terms(),
        }
    }
}

fn default_profile_alt() -> String {
    DEFAULT_PROFILE_ALT.to_string()
}
fn default_biography_title() -> String {
    DEFAULT_BIOGRAPHY_TITLE.to_string()
}
fn default_biography_content() -> String {
    DEFAULT_BIOGRAPHY_CONTENT.to_string()
}
fn default_contact_email() -> String {
    DEFAULT_CONTACT_EMAIL.to_string()
}
fn default_country() -> String {
    crate::order::DEFAULT_COUNTRY.to_string()
}
fn default_privacy() -> LegalPage {
    LegalPage {
        title: DEFAULT_PRIVACY_TITLE.to_string(),
        content: String::new(),
        last_updated: None,
    }
}
fn default_terms() -> LegalPage {
    LegalPage {
        title: DEFAULT_TERMS_TITLE.to_string(),
        content: String::new(),
        last_updated: None,
    }
}

// ---------------------------------------------------------------------------
// Merge and validation
// ---------------------------------------------------------------------------

/// Apply an RFC 7386 JSON merge patch to `target`.
///
/// Objects merge key by key, `null` deletes a key, and anything else
/// replaces the target value.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

pub fn validate_biography(bio: &Biography) -> Result<(), String> {
    crate::validation::validate_required_text("Biography title", &bio.title, 200)?;
    crate::validation::validate_required_text("Biography content", &bio.content, MAX_BIOGRAPHY_LENGTH)
}

pub fn validate_contact(contact: &ContactInfo) -> Result<(), String> {
    crate::validation::validate_email(&contact.email)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_from_empty_documents() {
        let bio: Biography = serde_json::from_value(json!({})).unwrap();
        assert_eq!(bio.title, "Biografía");
        assert_eq!(bio.content, DEFAULT_BIOGRAPHY_CONTENT);
        assert_eq!(bio.profile_image.alt, DEFAULT_PROFILE_ALT);

        let contact: ContactInfo = serde_json::from_value(json!({})).unwrap();
        assert_eq!(contact.email, DEFAULT_CONTACT_EMAIL);
        assert_eq!(contact.address.country, "Argentina");

        let legal: LegalPages = serde_json::from_value(json!({})).unwrap();
        assert_eq!(legal.privacy_policy.title, "Política de Privacidad");
        assert_eq!(legal.terms_and_conditions.title, "Términos y Condiciones");
    }

    #[test]
    fn merge_patch_merges_nested_objects() {
        let mut doc = json!({"title": "Bio", "profile_image": {"url": "a", "alt": "x"}});
        merge_patch(&mut doc, &json!({"profile_image": {"url": "b"}, "subtitle": "Pintora"}));
        assert_eq!(doc["profile_image"]["url"], "b");
        assert_eq!(doc["profile_image"]["alt"], "x");
        assert_eq!(doc["subtitle"], "Pintora");
        assert_eq!(doc["title"], "Bio");
    }

    #[test]
    fn merge_patch_null_removes_and_arrays_replace() {
        let mut doc = json!({"phone": "123", "tags": [1, 2]});
        merge_patch(&mut doc, &json!({"phone": null, "tags": [3]}));
        assert!(doc.get("phone").is_none());
        assert_eq!(doc["tags"], json!([3]));
    }

    #[test]
    fn biography_length_limit() {
        let mut bio = Biography::default();
        assert!(validate_biography(&bio).is_ok());
        bio.content = "a".repeat(MAX_BIOGRAPHY_LENGTH + 1);
        assert!(validate_biography(&bio).is_err());
    }

    #[test]
    fn contact_email_checked() {
        let mut contact = ContactInfo::default();
        assert!(validate_contact(&contact).is_ok());
        contact.email = "nope".to_string();
        assert!(validate_contact(&contact).is_err());
    }
}
