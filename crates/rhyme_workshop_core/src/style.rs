//! crates/rhyme_workshop_core/src/style.rs
//!
//! Resolves the decorative style of the exported poem. The model picks the
//! palette; every field is checked against its vocabulary here and anything
//! unknown is replaced by the default for that field. This function never
//! fails.

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{BorderStyle, FontFamily, IconName, Rgb, StyleDescriptor};
use crate::payload::parse_payload;
use crate::ports::{GenerationOptions, TextGenerationService};
use crate::prompts::{fill, STYLE_TEMPLATE};

/// The style object as the model returns it, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StyleRecord {
    font: Option<String>,
    #[serde(alias = "bg_color_hex")]
    background_color_hex: Option<String>,
    #[serde(alias = "text_color_hex")]
    text_color_hex: Option<String>,
    #[serde(alias = "title_color_hex")]
    title_color_hex: Option<String>,
    #[serde(alias = "border_color_hex")]
    border_color_hex: Option<String>,
    #[serde(alias = "border_style")]
    border_style: Option<String>,
    #[serde(alias = "icon_name", alias = "icon")]
    icon_name: Option<String>,
}

/// Asks the assistant for a style that suits the poem.
pub async fn resolve_style(
    ai: &dyn TextGenerationService,
    theme: &str,
    poem: &str,
) -> StyleDescriptor {
    let icons = IconName::ALL
        .iter()
        .map(|icon| format!("\"{}\"", icon.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let prompt = fill(
        STYLE_TEMPLATE,
        &[("theme", theme), ("poem", poem), ("icons", icons.as_str())],
    );

    let raw = match ai.generate(&prompt, GenerationOptions::default()).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Style generation unavailable, using the default style: {}", e);
            return StyleDescriptor::default();
        }
    };
    parse_style(&raw)
}

/// Parses a model response into a descriptor, repairing field by field.
pub fn parse_style(raw: &str) -> StyleDescriptor {
    let record: StyleRecord = match parse_payload(raw) {
        Ok(record) => record,
        Err(e) => {
            warn!("Style response could not be parsed, using the default style: {}", e);
            return StyleDescriptor::default();
        }
    };

    let defaults = StyleDescriptor::default();
    let style = StyleDescriptor {
        font: pick(record.font.as_deref(), FontFamily::parse, defaults.font, "font"),
        background: pick(
            record.background_color_hex.as_deref(),
            Rgb::from_hex,
            defaults.background,
            "backgroundColorHex",
        ),
        text: pick(record.text_color_hex.as_deref(), Rgb::from_hex, defaults.text, "textColorHex"),
        title: pick(
            record.title_color_hex.as_deref(),
            Rgb::from_hex,
            defaults.title,
            "titleColorHex",
        ),
        border: pick(
            record.border_color_hex.as_deref(),
            Rgb::from_hex,
            defaults.border,
            "borderColorHex",
        ),
        border_style: pick(
            record.border_style.as_deref(),
            BorderStyle::parse,
            defaults.border_style,
            "borderStyle",
        ),
        icon: match record.icon_name.as_deref() {
            Some(name) => {
                let icon = IconName::parse(name);
                if icon.is_none() {
                    warn!("Unknown icon '{}' from the assistant, dropping it.", name);
                }
                icon.or(defaults.icon)
            }
            None => defaults.icon,
        },
    };
    info!(
        "Resolved style: font={}, border={}, icon={:?}",
        style.font.as_str(),
        style.border_style.as_str(),
        style.icon.map(|i| i.as_str())
    );
    style
}

fn pick<T>(value: Option<&str>, parse: impl Fn(&str) -> Option<T>, default: T, field: &str) -> T {
    match value {
        Some(value) => parse(value).unwrap_or_else(|| {
            warn!("Invalid {} '{}' from the assistant, using the default.", field, value);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedAi;

    const GOOD: &str = r##"```json
{
  "font": "Times",
  "backgroundColorHex": "#FFF8DC",
  "textColorHex": "#333333",
  "titleColorHex": "#8B0000",
  "borderColorHex": "#DAA520",
  "borderStyle": "estrelas",
  "iconName": "lua"
}
```"##;

    #[test]
    fn a_valid_response_is_used_as_is() {
        let style = parse_style(GOOD);
        assert_eq!(style.font, FontFamily::Times);
        assert_eq!(style.background, Rgb::new(0xFF, 0xF8, 0xDC));
        assert_eq!(style.border, Rgb::new(0xDA, 0xA5, 0x20));
        assert_eq!(style.border_style, BorderStyle::Estrelas);
        assert_eq!(style.icon, Some(IconName::Lua));
    }

    #[test]
    fn unknown_border_and_icon_fall_back_per_field() {
        let style = parse_style(
            r##"{"font": "Courier", "borderStyle": "ondas", "iconName": "dragao", "textColorHex": "#000000"}"##,
        );
        let defaults = StyleDescriptor::default();
        assert_eq!(style.font, FontFamily::Courier);
        assert_eq!(style.text, Rgb::new(0, 0, 0));
        assert_eq!(style.border_style, defaults.border_style);
        assert_eq!(style.icon, defaults.icon);
        assert_eq!(style.background, defaults.background);
    }

    #[test]
    fn bad_colours_and_fonts_fall_back_per_field() {
        let style = parse_style(r##"{"font": "Papyrus", "titleColorHex": "vermelho", "bgColorHex": 12}"##);
        assert_eq!(style, StyleDescriptor::default());
    }

    #[test]
    fn original_snake_case_keys_are_accepted() {
        let style = parse_style(r##"{"bg_color_hex": "#101010", "border_style": "dupla"}"##);
        assert_eq!(style.background, Rgb::grey(0x10));
        assert_eq!(style.border_style, BorderStyle::Dupla);
    }

    #[test]
    fn non_json_yields_the_whole_default() {
        assert_eq!(parse_style("Que tema lindo!"), StyleDescriptor::default());
        assert_eq!(parse_style("[\"Times\"]"), StyleDescriptor::default());
    }

    #[tokio::test]
    async fn unavailable_gateway_yields_the_default() {
        let ai = ScriptedAi::unavailable();
        assert_eq!(resolve_style(&ai, "mar", "ondas do mar").await, StyleDescriptor::default());
    }

    #[tokio::test]
    async fn prompt_lists_the_icon_vocabulary() {
        let ai = ScriptedAi::replying(GOOD);
        resolve_style(&ai, "noite", "a lua").await;
        let prompt = &ai.prompts()[0];
        assert!(prompt.contains("\"estrela\""));
        assert!(prompt.contains("\"nota\""));
        assert!(prompt.contains("noite"));
    }
}
