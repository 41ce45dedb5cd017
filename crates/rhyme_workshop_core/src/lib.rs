pub mod assistant;
pub mod correction;
pub mod domain;
pub mod icons;
pub mod layout;
pub mod payload;
pub mod ports;
pub mod prompts;
pub mod style;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use domain::{
    BorderStyle, Fetched, FontFamily, GeneratedPdf, IconName, Issue, PoemDocument, PoemStats, Rgb,
    RhymeEntry, RhymeLookup, Session, Stage, StyleDescriptor,
};
pub use layout::{compose_poem, Canvas, Font, FontStyle, Point};
pub use ports::{GenerationOptions, PoemRenderer, PortError, PortResult, TextGenerationService};
pub use workflow::{pdf_file_name, StageError, Workshop};
