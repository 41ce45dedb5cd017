//! Test doubles shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{PoemDocument, StyleDescriptor};
use crate::ports::{GenerationOptions, PortError, PortResult, PoemRenderer, TextGenerationService};

/// A text generator that answers from a script and records every call.
///
/// Routes are matched by substring against the prompt. A route with several
/// replies hands them out in order and then keeps repeating the last one.
pub struct ScriptedAi {
    routes: Mutex<Vec<(String, VecDeque<String>)>>,
    fallback: Option<String>,
    calls: Mutex<Vec<(String, GenerationOptions)>>,
}

impl ScriptedAi {
    pub fn replying(reply: &str) -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            fallback: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(self, needle: &str, replies: &[&str]) -> Self {
        self.routes.lock().unwrap().push((
            needle.to_string(),
            replies.iter().map(|r| r.to_string()).collect(),
        ));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn options(&self) -> Vec<GenerationOptions> {
        self.calls.lock().unwrap().iter().map(|(_, o)| *o).collect()
    }
}

#[async_trait]
impl TextGenerationService for ScriptedAi {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> PortResult<String> {
        self.calls.lock().unwrap().push((prompt.to_string(), options));

        let mut routes = self.routes.lock().unwrap();
        if let Some((_, replies)) = routes.iter_mut().find(|(needle, _)| prompt.contains(needle.as_str())) {
            let reply = if replies.len() > 1 {
                replies.pop_front()
            } else {
                replies.front().cloned()
            };
            if let Some(reply) = reply {
                return Ok(reply);
            }
        }
        self.fallback
            .clone()
            .ok_or_else(|| PortError::Unavailable("no API key configured".to_string()))
    }
}

/// A renderer that returns a fixed byte string, or fails on demand.
pub struct StubRenderer {
    pub fail: bool,
    pub rendered: Mutex<Vec<(PoemDocument, StyleDescriptor)>>,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self {
            fail: false,
            rendered: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            rendered: Mutex::new(Vec::new()),
        }
    }
}

impl PoemRenderer for StubRenderer {
    fn render(&self, poem: &PoemDocument, style: &StyleDescriptor) -> PortResult<Vec<u8>> {
        if self.fail {
            return Err(PortError::Unexpected("canvas exploded".to_string()));
        }
        self.rendered
            .lock()
            .unwrap()
            .push((poem.clone(), style.clone()));
        Ok(format!("%PDF-stub {}", poem.title).into_bytes())
    }
}
