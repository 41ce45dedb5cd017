//! crates/rhyme_workshop_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! Serialization concerns live at the edges (assistant wire records, web views).

use std::collections::BTreeMap;
use std::fmt;

//=========================================================================================
// Workflow Stage
//=========================================================================================

/// The step of the guided workflow a session is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    GettingInterest,
    ChoosingTheme,
    WritingPoem,
    FinalizingPoem,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::GettingInterest => "getting_interest",
            Stage::ChoosingTheme => "choosing_theme",
            Stage::WritingPoem => "writing_poem",
            Stage::FinalizingPoem => "finalizing_poem",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Assistant Results
//=========================================================================================

/// The outcome of an assistant call as stored in the session.
///
/// `Failed` carries a message that can be shown to the child as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ready(T),
    Failed(String),
}

impl<T> Fetched<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Fetched::Ready(value) => Some(value),
            Fetched::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Fetched::Ready(_) => None,
            Fetched::Failed(message) => Some(message),
        }
    }
}

impl<T: Default> Default for Fetched<T> {
    fn default() -> Self {
        Fetched::Ready(T::default())
    }
}

/// A flagged spelling or capitalization problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub original: String,
    /// Best suggestion first, at most three.
    pub suggestions: Vec<String>,
    pub reason: String,
    /// 1-based line number in the poem text.
    pub verse_number: u32,
}

/// A word that rhymes with the queried one, with a child-friendly definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhymeEntry {
    pub word: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RhymeLookup {
    pub word: String,
    pub result: Fetched<Vec<RhymeEntry>>,
}

//=========================================================================================
// Style Descriptor
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Courier,
    Helvetica,
    Times,
}

impl FontFamily {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "courier" => Some(FontFamily::Courier),
            "helvetica" | "arial" => Some(FontFamily::Helvetica),
            "times" => Some(FontFamily::Times),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontFamily::Courier => "Courier",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::Times => "Times",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderStyle {
    Simples,
    Dupla,
    Estrelas,
}

impl BorderStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "simples" => Some(BorderStyle::Simples),
            "dupla" => Some(BorderStyle::Dupla),
            "estrelas" => Some(BorderStyle::Estrelas),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::Simples => "simples",
            BorderStyle::Dupla => "dupla",
            BorderStyle::Estrelas => "estrelas",
        }
    }
}

/// Identifiers of the fixed watermark icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconName {
    Estrela,
    Coracao,
    Sol,
    Lua,
    Flor,
    Nuvem,
    Borboleta,
    Nota,
}

impl IconName {
    pub const ALL: [IconName; 8] = [
        IconName::Estrela,
        IconName::Coracao,
        IconName::Sol,
        IconName::Lua,
        IconName::Flor,
        IconName::Nuvem,
        IconName::Borboleta,
        IconName::Nota,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|icon| {
            icon.as_str() == value || (*icon == IconName::Coracao && value == "coração")
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconName::Estrela => "estrela",
            IconName::Coracao => "coracao",
            IconName::Sol => "sol",
            IconName::Lua => "lua",
            IconName::Flor => "flor",
            IconName::Nuvem => "nuvem",
            IconName::Borboleta => "borboleta",
            IconName::Nota => "nota",
        }
    }
}

/// An sRGB colour with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Parses `#RRGGBB` (the `#` is optional). Anything else is rejected.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Moves `amount` (0.0..=1.0) of the way from `self` towards `other`.
    pub fn blend(&self, other: Rgb, amount: f32) -> Rgb {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

/// The palette and decoration applied to the exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub font: FontFamily,
    pub background: Rgb,
    pub text: Rgb,
    pub title: Rgb,
    pub border: Rgb,
    pub border_style: BorderStyle,
    pub icon: Option<IconName>,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            font: FontFamily::Helvetica,
            background: Rgb::new(0xF0, 0xF8, 0xFF),
            text: Rgb::new(0x2F, 0x4F, 0x4F),
            title: Rgb::new(0xFF, 0x63, 0x47),
            border: Rgb::new(0x46, 0x82, 0xB4),
            border_style: BorderStyle::Simples,
            icon: None,
        }
    }
}

//=========================================================================================
// Poem and Session
//=========================================================================================

/// Everything the renderer needs to lay out the final page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemDocument {
    pub title: String,
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoemStats {
    pub verses: usize,
    pub stanzas: usize,
}

impl PoemStats {
    pub fn of(text: &str) -> Self {
        let verses = text.lines().filter(|line| !line.trim().is_empty()).count();
        let stanzas = text
            .split("\n\n")
            .filter(|stanza| !stanza.trim().is_empty())
            .count();
        Self { verses, stanzas }
    }
}

/// The state of one child's trip through the workshop.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub stage: Stage,
    pub interest_text: String,
    pub themes: Fetched<Vec<String>>,
    pub chosen_theme: String,
    pub poem_text: String,
    pub issues: Fetched<Vec<Issue>>,
    pub rhymes: Option<RhymeLookup>,
    pub progression_ideas: Fetched<Vec<String>>,
    pub pdf: Option<GeneratedPdf>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            stage: Stage::GettingInterest,
            interest_text: String::new(),
            themes: Fetched::default(),
            chosen_theme: String::new(),
            poem_text: String::new(),
            issues: Fetched::default(),
            rhymes: None,
            progression_ideas: Fetched::default(),
            pdf: None,
        }
    }

    pub fn stats(&self) -> PoemStats {
        PoemStats::of(&self.poem_text)
    }

    /// Current issues keyed by verse number, in ascending verse order.
    pub fn issues_by_verse(&self) -> BTreeMap<u32, Vec<&Issue>> {
        let mut grouped: BTreeMap<u32, Vec<&Issue>> = BTreeMap::new();
        if let Fetched::Ready(issues) = &self.issues {
            for issue in issues {
                grouped.entry(issue.verse_number).or_default().push(issue);
            }
        }
        grouped
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
