//! Prompt handling for `POST /api/ai`.
//!
//! With a provider configured the prompt and note context are forwarded
//! upstream. Without one, one of three canned templates is returned and the
//! response is flagged as a demo.

use crate::claude::{TextGenerator, compose_prompt};
use crate::error::AssistError;
use note_assist_types::{AssistRequest, AssistResponse, ProviderMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Number of canned fallback templates.
pub const TEMPLATE_COUNT: usize = 3;

// =====================================================
// Template selection
// =====================================================

/// Picks an index in `0..count` for the fallback template table.
pub trait TemplateSelector: Send + Sync {
    fn select(&self, count: usize) -> usize;
}

impl<F> TemplateSelector for F
where
    F: Fn(usize) -> usize + Send + Sync,
{
    fn select(&self, count: usize) -> usize {
        self(count)
    }
}

/// Uniform random selection; seedable for reproducible sequences.
pub struct RandomSelector {
    rng: Mutex<StdRng>,
}

impl RandomSelector {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TemplateSelector for RandomSelector {
    fn select(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..count),
            Err(poisoned) => poisoned.into_inner().gen_range(0..count),
        }
    }
}

// =====================================================
// Fallback templates
// =====================================================

fn pick<'a>(cond: bool, yes: &'a str, no: &'a str) -> &'a str {
    if cond { yes } else { no }
}

/// Bullet list of ideas; each bullet keyed off a word in the prompt.
pub fn ideas_template(prompt: &str) -> String {
    let lower = prompt.to_lowercase();
    format!(
        "Based on your request, here are some ideas:\n\n• {}\n• {}\n• {}",
        pick(
            lower.contains("brainstorm"),
            "Consider breaking down the problem into smaller components",
            "Expand on the main themes you've outlined",
        ),
        pick(
            lower.contains("improve"),
            "Add more specific examples to illustrate your points",
            "Explore alternative perspectives",
        ),
        pick(
            lower.contains("expand"),
            "Include relevant statistics or data to support your arguments",
            "Consider the implications of your ideas",
        ),
    )
}

/// Numbered plan; acknowledges existing note content when there is some.
pub fn analysis_template(has_context: bool) -> String {
    format!(
        "Here's my analysis:\n\n{}I suggest:\n\n1. Define clear objectives\n2. Research supporting evidence\n3. Develop actionable next steps\n4. Consider potential challenges",
        pick(has_context, "Building on what you've written, ", ""),
    )
}

/// Check-mark additions; answers questions differently from statements.
pub fn additions_template(prompt: &str) -> String {
    format!(
        "Great thinking! Here are some additions:\n\n✓ {}, consider these angles\n✓ This could lead to interesting developments in [related area]\n✓ Don't forget to factor in [relevant consideration]",
        pick(prompt.contains('?'), "To answer your question", "Following your thought"),
    )
}

/// Render template `index` (taken modulo the table size).
pub fn render_template(index: usize, prompt: &str, has_context: bool) -> String {
    match index % TEMPLATE_COUNT {
        0 => ideas_template(prompt),
        1 => analysis_template(has_context),
        _ => additions_template(prompt),
    }
}

// =====================================================
// Proxy
// =====================================================

pub struct AssistProxy {
    generator: Option<Arc<dyn TextGenerator>>,
    selector: Box<dyn TemplateSelector>,
}

impl AssistProxy {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            selector: Box::new(RandomSelector::from_entropy()),
        }
    }

    /// Demo-only proxy; never touches the network.
    pub fn demo() -> Self {
        Self::new(None)
    }

    pub fn with_selector(mut self, selector: impl TemplateSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    pub fn mode(&self) -> ProviderMode {
        if self.generator.is_some() {
            ProviderMode::Anthropic
        } else {
            ProviderMode::Demo
        }
    }

    pub fn model(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.model())
    }

    pub async fn assist(&self, req: &AssistRequest) -> Result<AssistResponse, AssistError> {
        let prompt = match req.prompt.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => return Err(AssistError::Validation),
        };
        let context = req.context.as_deref();

        let Some(generator) = &self.generator else {
            let has_context = context.is_some_and(|c| !c.is_empty());
            let index = self.selector.select(TEMPLATE_COUNT);
            log::debug!("[NOTE_ASSIST] Serving fallback template #{}", index % TEMPLATE_COUNT);
            return Ok(AssistResponse::demo(render_template(index, prompt, has_context)));
        };

        let composed = compose_prompt(prompt, context);
        let result = generator.generate(&composed).await?;
        Ok(AssistResponse::generated(result))
    }
}
