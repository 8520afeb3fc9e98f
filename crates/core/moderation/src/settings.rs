use anuncios_database::{Database, ModerationSetting};
use anuncios_models::v0::{RulesEnforcement, SettingKind, StrictnessLevel};
use anuncios_result::Result;

/// Typed view over the settings collection
///
/// Every field has a documented default; a missing or unparseable stored
/// value falls back to it, moderation never fails because a knob is absent.
#[derive(Debug, Clone)]
pub struct ModerationSettings {
    /// Minimum composite score for automatic approval, 0 to 100
    pub ai_confidence_threshold: i32,
    /// Overall policing aggressiveness, surfaced for admin tooling
    pub strictness_level: StrictnessLevel,
    /// Keyword rule enforcement level
    pub cuba_rules_enforcement: RulesEnforcement,
    /// Strikes a seller may accumulate before a ban
    pub max_strikes_before_ban: u32,
    /// Appeals a seller may file against one review
    pub max_appeals_per_listing: u32,
    /// Whether submissions may be decided without a human
    pub auto_approve_enabled: bool,
    /// Whether every submission waits for a human
    pub manual_review_required: bool,
    /// Whether blacklist checks run on submission
    pub blacklist_enabled: bool,
    /// Whether spam heuristics run on submission
    pub spam_detection_enabled: bool,
    /// Whether duplicate detection runs on submission
    pub duplicate_detection_enabled: bool,
    /// Whether images are sent to the classifier
    pub image_moderation_enabled: bool,
}

impl Default for ModerationSettings {
    fn default() -> ModerationSettings {
        ModerationSettings {
            ai_confidence_threshold: 70,
            strictness_level: StrictnessLevel::High,
            cuba_rules_enforcement: RulesEnforcement::Strict,
            max_strikes_before_ban: 5,
            max_appeals_per_listing: 2,
            auto_approve_enabled: true,
            manual_review_required: false,
            blacklist_enabled: true,
            spam_detection_enabled: true,
            duplicate_detection_enabled: true,
            image_moderation_enabled: true,
        }
    }
}

fn parse<T: std::str::FromStr>(value: Option<&String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl ModerationSettings {
    /// Load the typed view from the database
    pub async fn load(db: &Database) -> Result<ModerationSettings> {
        let stored: std::collections::HashMap<String, String> = db
            .fetch_settings()
            .await?
            .into_iter()
            .map(|setting| (setting.key, setting.value))
            .collect();

        let defaults = ModerationSettings::default();

        Ok(ModerationSettings {
            ai_confidence_threshold: parse(
                stored.get("ai_confidence_threshold"),
                defaults.ai_confidence_threshold,
            ),
            strictness_level: parse(stored.get("strictness_level"), defaults.strictness_level),
            cuba_rules_enforcement: parse(
                stored.get("cuba_rules_enforcement"),
                defaults.cuba_rules_enforcement,
            ),
            max_strikes_before_ban: parse(
                stored.get("max_strikes_before_ban"),
                defaults.max_strikes_before_ban,
            ),
            max_appeals_per_listing: parse(
                stored.get("max_appeals_per_listing"),
                defaults.max_appeals_per_listing,
            ),
            auto_approve_enabled: parse(
                stored.get("auto_approve_enabled"),
                defaults.auto_approve_enabled,
            ),
            manual_review_required: parse(
                stored.get("manual_review_required"),
                defaults.manual_review_required,
            ),
            blacklist_enabled: parse(stored.get("blacklist_enabled"), defaults.blacklist_enabled),
            spam_detection_enabled: parse(
                stored.get("spam_detection_enabled"),
                defaults.spam_detection_enabled,
            ),
            duplicate_detection_enabled: parse(
                stored.get("duplicate_detection_enabled"),
                defaults.duplicate_detection_enabled,
            ),
            image_moderation_enabled: parse(
                stored.get("image_moderation_enabled"),
                defaults.image_moderation_enabled,
            ),
        })
    }

    /// Write the default value and description for any missing key
    ///
    /// Existing values are left untouched, so this is safe to run on
    /// every deployment start.
    pub async fn seed(db: &Database) -> Result<()> {
        let defaults: &[(&str, &str, SettingKind, &str)] = &[
            (
                "ai_confidence_threshold",
                "70",
                SettingKind::Number,
                "Umbral de confianza mínimo para aprobación automática (0-100)",
            ),
            (
                "strictness_level",
                "high",
                SettingKind::Text,
                "Nivel de rigidez de moderación: low, medium, high, ultra",
            ),
            (
                "cuba_rules_enforcement",
                "strict",
                SettingKind::Text,
                "Nivel de aplicación de reglas: relaxed, standard, strict",
            ),
            (
                "max_strikes_before_ban",
                "5",
                SettingKind::Number,
                "Número de infracciones antes de suspender al vendedor",
            ),
            (
                "max_appeals_per_listing",
                "2",
                SettingKind::Number,
                "Número máximo de apelaciones permitidas por anuncio",
            ),
            (
                "auto_approve_enabled",
                "true",
                SettingKind::Toggle,
                "Permitir aprobación automática de anuncios",
            ),
            (
                "manual_review_required",
                "false",
                SettingKind::Toggle,
                "Requerir revisión manual para todos los anuncios",
            ),
            (
                "blacklist_enabled",
                "true",
                SettingKind::Toggle,
                "Activar sistema de lista negra",
            ),
            (
                "spam_detection_enabled",
                "true",
                SettingKind::Toggle,
                "Activar detección automática de spam",
            ),
            (
                "duplicate_detection_enabled",
                "true",
                SettingKind::Toggle,
                "Activar detección de anuncios duplicados",
            ),
            (
                "image_moderation_enabled",
                "true",
                SettingKind::Toggle,
                "Activar moderación de imágenes con AI",
            ),
        ];

        for (key, value, kind, description) in defaults {
            if db.fetch_setting(key).await?.is_none() {
                ModerationSetting::set(
                    db,
                    key,
                    value.to_string(),
                    *kind,
                    Some(description.to_string()),
                )
                .await?;
            }
        }

        info!("Seeded default moderation settings.");
        Ok(())
    }
}
